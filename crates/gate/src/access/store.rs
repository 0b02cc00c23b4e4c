// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The access store: authorization decisions over [`AccessState`] plus the
//! one-shot server config fetch with its coalescing guard.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::access::fetch::{fetch_server_config, FetchState};
use crate::access::{persist, AccessState};
use crate::config::{BuildMode, ClientConfig};
use crate::headers::request_headers;
use crate::model::{split_model_provider, ModelConfig};
use crate::provider::ServiceProvider;

/// Construction options for [`AccessStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub build_mode: BuildMode,
    /// Base URL of the hosting server.
    pub server_url: String,
    pub fetch_timeout: Duration,
    /// Store file path. `None` disables persistence.
    pub store_path: Option<PathBuf>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            build_mode: BuildMode::Hosted,
            server_url: "http://127.0.0.1:3000".to_owned(),
            fetch_timeout: Duration::from_secs(10),
            store_path: None,
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        Ok(Self {
            build_mode: config.build_mode_enum()?,
            server_url: config.server_url.clone(),
            fetch_timeout: config.fetch_timeout(),
            store_path: Some(persist::store_path(&config.state_dir())),
        })
    }
}

/// Owns the process-wide [`AccessState`] and answers the one question the
/// chat layer cares about: may this client make AI requests right now?
pub struct AccessStore {
    state: RwLock<AccessState>,
    /// The fetch guard. See [`FetchState`] for the transition contract.
    fetch_state: AtomicU8,
    http: reqwest::Client,
    options: StoreOptions,
    /// The chat layer's default model record, rewritten on a successful
    /// fetch when the server designates a default.
    model_config: Arc<RwLock<ModelConfig>>,
}

impl AccessStore {
    /// Create a store, loading persisted state when a store path is set.
    pub fn new(options: StoreOptions, model_config: Arc<RwLock<ModelConfig>>) -> Self {
        let state = match options.store_path {
            Some(ref path) => persist::load(path),
            None => AccessState::for_build(options.build_mode),
        };
        Self {
            state: RwLock::new(state),
            fetch_state: AtomicU8::new(FetchState::NotStarted as u8),
            http: reqwest::Client::builder()
                .timeout(options.fetch_timeout)
                .build()
                .unwrap_or_default(),
            options,
            model_config,
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> AccessState {
        self.state.read().await.clone()
    }

    /// Current value of the fetch guard.
    pub fn fetch_state(&self) -> FetchState {
        FetchState::from_u8(self.fetch_state.load(Ordering::Acquire))
    }

    /// Mutate state through the controller, persisting best-effort.
    pub async fn update(&self, mutate: impl FnOnce(&mut AccessState)) {
        let mut state = self.state.write().await;
        mutate(&mut state);
        self.persist(&state);
    }

    /// Resolved endpoint for a provider: the stored URL, or the build-mode
    /// default when the stored value is blank (e.g. cleared by migration).
    pub async fn endpoint(&self, provider: ServiceProvider) -> String {
        let state = self.state.read().await;
        let stored = state.provider_url(provider).trim();
        if stored.is_empty() {
            provider.default_endpoint(self.options.build_mode).to_owned()
        } else {
            stored.to_owned()
        }
    }

    /// Whether the deployment requires an access code.
    pub async fn enabled_access_control(&self) -> bool {
        self.fetch().await;
        self.state.read().await.need_code
    }

    /// Vision-capable model list, as designated by the server.
    pub async fn vision_models(&self) -> String {
        self.fetch().await;
        self.state.read().await.vision_models.clone()
    }

    /// TTS voice for read-aloud, as designated by the server.
    pub async fn edge_voice_name(&self) -> String {
        self.fetch().await;
        self.state.read().await.edge_tts_voice_name.clone()
    }

    /// May this client make AI requests?
    ///
    /// True when the user brought a usable key for any provider, when access
    /// control is off, or when the gate is on and an access code is present.
    /// Triggers the lazy fetch first so `need_code` reflects server truth
    /// when the server is reachable.
    pub async fn is_authorized(&self) -> bool {
        self.fetch().await;
        let state = self.state.read().await;
        state.any_provider_valid()
            || !state.need_code
            || (state.need_code && !state.access_code.trim().is_empty())
    }

    /// One-shot server config fetch.
    ///
    /// The caller that wins the `NotStarted -> InFlight` transition performs
    /// the request and awaits it; every other caller returns immediately.
    /// Exported builds never fetch. Success and failure both park the guard
    /// at `Done`: the process makes at most one attempt.
    pub async fn fetch(&self) {
        if self.options.build_mode == BuildMode::Export {
            return;
        }
        // Check-and-set before the first await point, so overlapping callers
        // coalesce onto a single request.
        if self
            .fetch_state
            .compare_exchange(
                FetchState::NotStarted as u8,
                FetchState::InFlight as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return;
        }

        let headers = {
            let state = self.state.read().await;
            request_headers(&state, state.provider)
        };

        match fetch_server_config(&self.http, &self.options.server_url, &headers).await {
            Ok(server) => {
                self.apply_server_config(server).await;
            }
            Err(e) => {
                tracing::warn!(err = %e, "failed to fetch server config");
            }
        }

        self.fetch_state.store(FetchState::Done as u8, Ordering::Release);
    }

    /// Merge a server config reply: rewrite the shared default-model record
    /// when one is designated, then overwrite the server-controlled state
    /// fields and persist.
    async fn apply_server_config(&self, server: crate::access::ServerConfig) {
        if let Some(ref default_model) = server.default_model {
            if !default_model.is_empty() {
                let (model, provider_name) = split_model_provider(default_model);
                let mut model_config = self.model_config.write().await;
                model_config.model = model.to_owned();
                if let Some(name) = provider_name {
                    match name.parse::<ServiceProvider>() {
                        Ok(provider) => model_config.provider_name = provider,
                        Err(e) => {
                            tracing::warn!(model = %default_model, err = %e, "server default model names an unknown provider")
                        }
                    }
                }
            }
        }

        tracing::info!(need_code = ?server.need_code, "got config from server");
        let mut state = self.state.write().await;
        server.apply(&mut state);
        self.persist(&state);
    }

    fn persist(&self, state: &AccessState) {
        let Some(ref path) = self.options.store_path else { return };
        if let Err(e) = persist::save(path, state) {
            tracing::warn!(path = %path.display(), err = %e, "failed to persist access state");
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
