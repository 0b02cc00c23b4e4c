// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standard headers for outbound API requests.
//!
//! One auth header per request: the user's own provider key wins; without
//! one, hosted deployments fall back to the shared access code, prefixed so
//! the server can tell codes and real keys apart.

use crate::access::AccessState;
use crate::provider::ServiceProvider;

/// Marks an access code sent in place of a real API key.
pub const ACCESS_CODE_PREFIX: &str = "nk-";

/// Build the headers for a request on behalf of `provider`.
pub fn request_headers(state: &AccessState, provider: ServiceProvider) -> Vec<(&'static str, String)> {
    let mut headers = vec![("content-type", "application/json".to_owned())];

    match user_api_key(state, provider) {
        Some(key) => match provider {
            // Vendor headers carry the raw key, no bearer scheme.
            ServiceProvider::Anthropic => headers.push(("x-api-key", key.to_owned())),
            ServiceProvider::Google => headers.push(("x-goog-api-key", key.to_owned())),
            _ => headers.push(("authorization", format!("Bearer {key}"))),
        },
        None => {
            let code = state.access_code.trim();
            if state.need_code && !code.is_empty() {
                headers.push(("authorization", format!("Bearer {ACCESS_CODE_PREFIX}{code}")));
            }
        }
    }

    headers
}

/// The user-supplied key for a provider, when present.
///
/// Baidu and Tencent sign their requests downstream instead of sending a
/// static credential header, so they never contribute a key here.
fn user_api_key(state: &AccessState, provider: ServiceProvider) -> Option<&str> {
    let key = match provider {
        ServiceProvider::OpenAi => &state.openai_api_key,
        ServiceProvider::Google => &state.google_api_key,
        ServiceProvider::Anthropic => &state.anthropic_api_key,
        ServiceProvider::ByteDance => &state.bytedance_api_key,
        ServiceProvider::Alibaba => &state.alibaba_api_key,
        ServiceProvider::Moonshot => &state.moonshot_api_key,
        ServiceProvider::Iflytek => &state.iflytek_api_key,
        ServiceProvider::DeepSeek => &state.deepseek_api_key,
        ServiceProvider::Xai => &state.xai_api_key,
        ServiceProvider::ChatGlm => &state.chatglm_api_key,
        ServiceProvider::SiliconFlow => &state.siliconflow_api_key,
        ServiceProvider::Baidu | ServiceProvider::Tencent => return None,
    };
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
#[path = "headers_tests.rs"]
mod tests;
