// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavior tests for the one-shot fetch: coalescing, terminal failure,
//! and the server-config merge. Uses an in-process axum endpoint so the
//! request count can be asserted exactly.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tokio::sync::RwLock;

use super::FetchState;
use crate::access::store::{AccessStore, StoreOptions};
use crate::config::BuildMode;
use crate::model::ModelConfig;
use crate::provider::ServiceProvider;

struct ConfigServer {
    url: String,
    hits: Arc<AtomicU32>,
}

impl ConfigServer {
    fn hit_count(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `POST /api/config` on an ephemeral port, counting requests.
async fn spawn_config_server(status: u16, body: String, delay: Duration) -> ConfigServer {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    let status = StatusCode::from_u16(status).unwrap();
    let app = Router::new().route(
        "/api/config",
        post(move || {
            let counter = Arc::clone(&counter);
            let body = body.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                (status, body)
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    ConfigServer { url: format!("http://{addr}"), hits }
}

fn hosted_store(server_url: &str) -> (AccessStore, Arc<RwLock<ModelConfig>>) {
    let model_config = Arc::new(RwLock::new(ModelConfig::default()));
    let options = StoreOptions {
        server_url: server_url.to_owned(),
        fetch_timeout: Duration::from_secs(2),
        ..StoreOptions::default()
    };
    (AccessStore::new(options, Arc::clone(&model_config)), model_config)
}

#[tokio::test]
async fn success_merges_server_fields_and_rewrites_model_config() {
    let response = serde_json::json!({
        "need_code": true,
        "vision_models": "gpt-4-vision",
        "default_model": "gpt-4@openai",
    });
    let server = spawn_config_server(200, response.to_string(), Duration::ZERO).await;
    let (store, model_config) = hosted_store(&server.url);

    assert!(store.enabled_access_control().await);
    assert_eq!(store.vision_models().await, "gpt-4-vision");

    let model = model_config.read().await.clone();
    assert_eq!(model.model, "gpt-4");
    assert_eq!(model.provider_name, ServiceProvider::OpenAi);

    assert_eq!(store.fetch_state(), FetchState::Done);
    assert_eq!(server.hit_count(), 1);
}

#[tokio::test]
async fn server_can_disable_the_gate() {
    let response = serde_json::json!({ "need_code": false });
    let server = spawn_config_server(200, response.to_string(), Duration::ZERO).await;
    let (store, _) = hosted_store(&server.url);

    // No keys, no code; the server turning the gate off is enough.
    assert!(store.is_authorized().await);
    assert!(!store.enabled_access_control().await);
}

#[tokio::test]
async fn concurrent_callers_coalesce_to_one_request() {
    let response = serde_json::json!({ "need_code": false });
    let server = spawn_config_server(200, response.to_string(), Duration::from_millis(100)).await;
    let (store, _) = hosted_store(&server.url);
    let store = Arc::new(store);

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move { store.fetch().await }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // Joining includes the winner, so the guard is parked by now.
    assert_eq!(store.fetch_state(), FetchState::Done);
    assert_eq!(server.hit_count(), 1);
}

#[tokio::test]
async fn failure_is_terminal_for_the_process() {
    let server = spawn_config_server(500, String::new(), Duration::ZERO).await;
    let (store, _) = hosted_store(&server.url);

    store.fetch().await;
    assert_eq!(store.fetch_state(), FetchState::Done);
    assert_eq!(server.hit_count(), 1);

    // No retry: the guard swallows every later call.
    store.fetch().await;
    store.fetch().await;
    assert_eq!(server.hit_count(), 1);
}

#[tokio::test]
async fn malformed_response_is_swallowed() {
    let server = spawn_config_server(200, "not json".to_owned(), Duration::ZERO).await;
    let (store, _) = hosted_store(&server.url);

    store.fetch().await;
    assert_eq!(store.fetch_state(), FetchState::Done);
    // Callers proceed with the compiled-in defaults.
    assert!(store.enabled_access_control().await);
}

#[tokio::test]
async fn unreachable_server_still_parks_the_guard() {
    let (store, _) = hosted_store("http://127.0.0.1:1");
    store.fetch().await;
    assert_eq!(store.fetch_state(), FetchState::Done);
    assert!(!store.is_authorized().await);
}

#[tokio::test]
async fn export_builds_never_fetch() {
    let server = spawn_config_server(200, "{}".to_owned(), Duration::ZERO).await;
    let model_config = Arc::new(RwLock::new(ModelConfig::default()));
    let options = StoreOptions {
        build_mode: BuildMode::Export,
        server_url: server.url.clone(),
        ..StoreOptions::default()
    };
    let store = AccessStore::new(options, model_config);

    store.fetch().await;
    store.fetch().await;
    assert_eq!(server.hit_count(), 0);
    assert_eq!(store.fetch_state(), FetchState::NotStarted);
}

#[tokio::test]
async fn getters_fetch_at_most_once() {
    let response = serde_json::json!({ "edge_tts_voice_name": "en-US-JennyNeural" });
    let server = spawn_config_server(200, response.to_string(), Duration::ZERO).await;
    let (store, _) = hosted_store(&server.url);

    assert_eq!(store.edge_voice_name().await, "en-US-JennyNeural");
    let _ = store.vision_models().await;
    let _ = store.is_authorized().await;
    assert_eq!(server.hit_count(), 1);
}

#[tokio::test]
async fn fetched_config_is_persisted() -> anyhow::Result<()> {
    let response = serde_json::json!({ "custom_models": "llama-3" });
    let server = spawn_config_server(200, response.to_string(), Duration::ZERO).await;

    let dir = tempfile::tempdir()?;
    let path = crate::access::persist::store_path(dir.path());
    let options = StoreOptions {
        server_url: server.url.clone(),
        store_path: Some(path.clone()),
        ..StoreOptions::default()
    };
    let store = AccessStore::new(options, Arc::new(RwLock::new(ModelConfig::default())));
    store.fetch().await;

    let reloaded = crate::access::persist::load(&path);
    assert_eq!(reloaded.custom_models, "llama-3");
    Ok(())
}
