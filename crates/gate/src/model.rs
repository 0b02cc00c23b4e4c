// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

use crate::provider::ServiceProvider;

/// The application's default model selection.
///
/// Owned by the chat layer, shared with the access store, which overwrites
/// `model`/`provider_name` when the server config names a default model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub provider_name: ServiceProvider,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { model: "gpt-4o-mini".into(), provider_name: ServiceProvider::OpenAi }
    }
}

/// Split a `model@provider` identifier into its parts.
///
/// Splits on the *last* `@` so model names that themselves contain `@`
/// (e.g. fine-tune tags) keep everything before the provider suffix.
/// Identifiers without `@` yield no provider.
pub fn split_model_provider(identifier: &str) -> (&str, Option<&str>) {
    match identifier.rsplit_once('@') {
        Some((model, provider)) if !provider.is_empty() => (model, Some(provider)),
        Some((model, _)) => (model, None),
        None => (identifier, None),
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
