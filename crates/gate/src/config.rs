// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// How this client build reaches its providers.
///
/// - `Hosted`: served by a hosting server; provider traffic goes through
///   local proxy paths and server defaults are fetched once at startup.
/// - `Export`: statically exported/offline build; providers are called
///   directly and no remote config fetch ever happens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Hosted,
    Export,
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hosted => f.write_str("hosted"),
            Self::Export => f.write_str("export"),
        }
    }
}

impl std::str::FromStr for BuildMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hosted" => Ok(Self::Hosted),
            "export" => Ok(Self::Export),
            other => anyhow::bail!("invalid build mode: {other}"),
        }
    }
}

/// Access gate for multi-provider AI chat clients.
#[derive(Debug, Clone, Parser)]
#[command(name = "chatgate", version, about)]
pub struct ClientConfig {
    /// Build mode (hosted, export).
    #[arg(long, env = "CHATGATE_BUILD_MODE", default_value = "hosted")]
    pub build_mode: String,

    /// Base URL of the hosting server (serves /api/config).
    #[arg(long, env = "CHATGATE_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    pub server_url: String,

    /// Directory for persisted state. Overrides the env-based default.
    #[arg(long, env = "CHATGATE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Remote config fetch timeout in ms.
    #[arg(long, env = "CHATGATE_FETCH_TIMEOUT_MS", default_value_t = 10_000)]
    pub fetch_timeout_ms: u64,

    /// Log format (json or text).
    #[arg(long, env = "CHATGATE_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "CHATGATE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ClientConfig {
    /// Validate the configuration after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.build_mode_enum()?;
        if self.server_url.trim().is_empty() {
            anyhow::bail!("--server-url must not be empty");
        }
        Ok(())
    }

    /// Parse the build mode string into an enum.
    pub fn build_mode_enum(&self) -> anyhow::Result<BuildMode> {
        self.build_mode.parse()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Directory holding the persisted access state.
    pub fn state_dir(&self) -> PathBuf {
        match self.state_dir {
            Some(ref dir) => dir.clone(),
            None => default_state_dir(),
        }
    }

    /// Build a minimal `ClientConfig` for tests (hosted, temp-friendly).
    #[doc(hidden)]
    pub fn test() -> Self {
        Self {
            build_mode: "hosted".into(),
            server_url: "http://127.0.0.1:0".into(),
            state_dir: None,
            fetch_timeout_ms: 1_000,
            log_format: "text".into(),
            log_level: "debug".into(),
        }
    }
}

/// Resolve the default state directory for chatgate data.
///
/// Checks `CHATGATE_STATE_DIR`, then `$XDG_STATE_HOME/chatgate`,
/// then `$HOME/.local/state/chatgate`.
pub fn default_state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATGATE_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("chatgate");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/chatgate");
    }
    PathBuf::from(".chatgate")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
