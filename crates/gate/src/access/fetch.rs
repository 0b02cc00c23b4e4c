// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire call for the one-shot server config fetch.
//!
//! The guard logic around it lives on [`super::store::AccessStore`]; this
//! module only knows how to reach the endpoint and parse the reply.

use crate::access::ServerConfig;

/// Lifecycle of the process-wide remote-config fetch.
///
/// Only ever moves forward: `NotStarted -> InFlight -> Done`. `Done` covers
/// success and failure alike; a process never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FetchState {
    NotStarted = 0,
    /// A request is in flight; concurrent callers coalesce onto it.
    InFlight = 1,
    /// Terminal, success or failure.
    Done = 2,
}

impl FetchState {
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::NotStarted,
            1 => Self::InFlight,
            _ => Self::Done,
        }
    }
}

/// `POST {server_url}/api/config` with an empty body and parse the
/// server-controlled fields. Unknown response keys are ignored.
pub(crate) async fn fetch_server_config(
    client: &reqwest::Client,
    server_url: &str,
    headers: &[(&'static str, String)],
) -> anyhow::Result<ServerConfig> {
    let url = format!("{}/api/config", server_url.trim_end_matches('/'));
    let mut req = client.post(&url);
    for (name, value) in headers {
        req = req.header(*name, value);
    }
    let resp = req.send().await?;
    let config = resp.error_for_status()?.json::<ServerConfig>().await?;
    Ok(config)
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
