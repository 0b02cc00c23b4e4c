// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chatgate: client-side access gate for multi-provider AI chat.

pub mod access;
pub mod config;
pub mod headers;
pub mod model;
pub mod provider;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::access::store::{AccessStore, StoreOptions};
use crate::config::ClientConfig;
use crate::model::ModelConfig;
use crate::provider::ALL_PROVIDERS;

/// Load the store, run the authorization check (which performs the one-shot
/// config fetch), and print a status report.
///
/// Returns whether the current state authorizes AI requests.
pub async fn run(config: ClientConfig) -> anyhow::Result<bool> {
    config.validate()?;

    let model_config = Arc::new(RwLock::new(ModelConfig::default()));
    let options = StoreOptions::from_config(&config)?;
    let store = AccessStore::new(options, Arc::clone(&model_config));

    let authorized = store.is_authorized().await;
    let state = store.state().await;
    let model = model_config.read().await.clone();

    println!("authorized: {}", if authorized { "yes" } else { "no" });
    if state.need_code {
        let code = if state.access_code.trim().is_empty() { "no code" } else { "code set" };
        println!("access control: enabled ({code})");
    } else {
        println!("access control: disabled");
    }
    println!("default model: {} ({})", model.model, model.provider_name);
    for provider in ALL_PROVIDERS {
        let mark = if state.is_valid_provider(provider) { "+" } else { " " };
        println!("  [{mark}] {:<12} {}", provider.label(), store.endpoint(provider).await);
    }

    Ok(authorized)
}
