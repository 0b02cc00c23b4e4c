// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::{default_state_dir, BuildMode, ClientConfig};

fn parse(args: &[&str]) -> ClientConfig {
    ClientConfig::parse_from(args)
}

#[test]
fn defaults_are_correct() -> anyhow::Result<()> {
    let config = parse(&["chatgate"]);
    config.validate()?;
    assert_eq!(config.build_mode_enum()?, BuildMode::Hosted);
    assert_eq!(config.server_url, "http://127.0.0.1:3000");
    assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    assert_eq!(config.log_format, "text");
    assert_eq!(config.log_level, "info");
    Ok(())
}

#[test]
fn export_mode_parses() -> anyhow::Result<()> {
    let config = parse(&["chatgate", "--build-mode", "export"]);
    config.validate()?;
    assert_eq!(config.build_mode_enum()?, BuildMode::Export);
    Ok(())
}

#[test]
fn build_mode_case_insensitive() -> anyhow::Result<()> {
    assert_eq!("EXPORT".parse::<BuildMode>()?, BuildMode::Export);
    Ok(())
}

#[test]
fn invalid_build_mode_rejected_at_validate() {
    let config = parse(&["chatgate", "--build-mode", "native"]);
    assert!(config.validate().is_err());
}

#[test]
fn blank_server_url_rejected_at_validate() {
    let config = parse(&["chatgate", "--server-url", "  "]);
    assert!(config.validate().is_err());
}

#[test]
fn state_dir_flag_overrides_default() {
    let config = parse(&["chatgate", "--state-dir", "/tmp/gate-state"]);
    assert_eq!(config.state_dir(), PathBuf::from("/tmp/gate-state"));
}

#[test]
#[serial_test::serial]
fn state_dir_env_chain() {
    std::env::remove_var("CHATGATE_STATE_DIR");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(default_state_dir(), PathBuf::from("/tmp/xdg-state/chatgate"));

    std::env::set_var("CHATGATE_STATE_DIR", "/tmp/explicit");
    assert_eq!(default_state_dir(), PathBuf::from("/tmp/explicit"));

    std::env::remove_var("CHATGATE_STATE_DIR");
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial_test::serial]
fn state_dir_falls_back_to_home() {
    std::env::remove_var("CHATGATE_STATE_DIR");
    std::env::remove_var("XDG_STATE_HOME");
    std::env::set_var("HOME", "/home/tester");
    assert_eq!(default_state_dir(), PathBuf::from("/home/tester/.local/state/chatgate"));
}
