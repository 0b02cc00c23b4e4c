// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access state: per-provider endpoints and secrets, the deployment-wide
//! access-code gate, and the server-controlled capability flags.
//!
//! Plain data only. The decision logic lives on [`store::AccessStore`].

pub mod fetch;
pub mod persist;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::provider::{GoogleSafetySetting, ServiceProvider};

/// Everything the client knows about how it is allowed to call providers.
///
/// One instance exists per running client. Absent fields deserialize from
/// [`Default`], so snapshots persisted by older builds pick up newly
/// introduced fields on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessState {
    /// Session token issued by the hosting server.
    pub token: String,
    /// Deployment-wide shared secret, required when `need_code` is set.
    pub access_code: String,
    /// Session token expiry, epoch milliseconds.
    pub token_expired_at: u64,
    pub use_custom_config: bool,

    /// Currently selected provider.
    pub provider: ServiceProvider,

    pub openai_url: String,
    pub openai_api_key: String,

    pub google_url: String,
    pub google_api_key: String,
    pub google_api_version: String,
    pub google_safety_settings: GoogleSafetySetting,

    pub anthropic_url: String,
    pub anthropic_api_key: String,
    pub anthropic_api_version: String,

    pub baidu_url: String,
    pub baidu_api_key: String,
    pub baidu_secret_key: String,

    pub bytedance_url: String,
    pub bytedance_api_key: String,

    pub alibaba_url: String,
    pub alibaba_api_key: String,

    pub tencent_url: String,
    pub tencent_secret_id: String,
    pub tencent_secret_key: String,

    pub moonshot_url: String,
    pub moonshot_api_key: String,

    pub iflytek_url: String,
    pub iflytek_api_key: String,
    pub iflytek_api_secret: String,

    pub deepseek_url: String,
    pub deepseek_api_key: String,

    pub xai_url: String,
    pub xai_api_key: String,

    pub chatglm_url: String,
    pub chatglm_api_key: String,

    pub siliconflow_url: String,
    pub siliconflow_api_key: String,

    /// Whether the deployment requires an access code.
    pub need_code: bool,
    pub hide_user_api_key: bool,
    pub hide_balance_query: bool,
    pub disable_gpt4: bool,
    pub disable_fast_link: bool,

    /// Extra model list, opaque comma-delimited identifiers.
    pub custom_models: String,
    /// Server-designated default model (`model@provider`).
    pub default_model: String,
    /// Models treated as vision-capable, opaque to this module.
    pub vision_models: String,

    pub edge_tts_voice_name: String,
}

impl Default for AccessState {
    fn default() -> Self {
        use crate::config::BuildMode;
        Self::for_build(BuildMode::Hosted)
    }
}

impl AccessState {
    /// Compiled-in defaults for the given build mode: provider URLs point at
    /// the proxy paths (hosted) or the direct base URLs (export), every
    /// secret is empty, and the access-code gate is on until the server says
    /// otherwise.
    pub fn for_build(mode: crate::config::BuildMode) -> Self {
        use ServiceProvider as P;
        Self {
            token: String::new(),
            access_code: String::new(),
            token_expired_at: 0,
            use_custom_config: false,
            provider: P::OpenAi,
            openai_url: P::OpenAi.default_endpoint(mode).into(),
            openai_api_key: String::new(),
            google_url: P::Google.default_endpoint(mode).into(),
            google_api_key: String::new(),
            google_api_version: "v1".into(),
            google_safety_settings: GoogleSafetySetting::BlockOnlyHigh,
            anthropic_url: P::Anthropic.default_endpoint(mode).into(),
            anthropic_api_key: String::new(),
            anthropic_api_version: "2023-06-01".into(),
            baidu_url: P::Baidu.default_endpoint(mode).into(),
            baidu_api_key: String::new(),
            baidu_secret_key: String::new(),
            bytedance_url: P::ByteDance.default_endpoint(mode).into(),
            bytedance_api_key: String::new(),
            alibaba_url: P::Alibaba.default_endpoint(mode).into(),
            alibaba_api_key: String::new(),
            tencent_url: P::Tencent.default_endpoint(mode).into(),
            tencent_secret_id: String::new(),
            tencent_secret_key: String::new(),
            moonshot_url: P::Moonshot.default_endpoint(mode).into(),
            moonshot_api_key: String::new(),
            iflytek_url: P::Iflytek.default_endpoint(mode).into(),
            iflytek_api_key: String::new(),
            iflytek_api_secret: String::new(),
            deepseek_url: P::DeepSeek.default_endpoint(mode).into(),
            deepseek_api_key: String::new(),
            xai_url: P::Xai.default_endpoint(mode).into(),
            xai_api_key: String::new(),
            chatglm_url: P::ChatGlm.default_endpoint(mode).into(),
            chatglm_api_key: String::new(),
            siliconflow_url: P::SiliconFlow.default_endpoint(mode).into(),
            siliconflow_api_key: String::new(),
            need_code: true,
            hide_user_api_key: false,
            hide_balance_query: false,
            disable_gpt4: false,
            disable_fast_link: false,
            custom_models: String::new(),
            default_model: String::new(),
            vision_models: String::new(),
            edge_tts_voice_name: "zh-CN-YunxiNeural".into(),
        }
    }

    // Per-provider validity: every required secret present (non-blank after
    // trimming). A provider's validity never depends on another provider.

    pub fn is_valid_openai(&self) -> bool {
        all_present(&[&self.openai_api_key])
    }

    pub fn is_valid_google(&self) -> bool {
        all_present(&[&self.google_api_key])
    }

    pub fn is_valid_anthropic(&self) -> bool {
        all_present(&[&self.anthropic_api_key])
    }

    /// Baidu needs both halves of its credential pair.
    pub fn is_valid_baidu(&self) -> bool {
        all_present(&[&self.baidu_api_key, &self.baidu_secret_key])
    }

    pub fn is_valid_bytedance(&self) -> bool {
        all_present(&[&self.bytedance_api_key])
    }

    pub fn is_valid_alibaba(&self) -> bool {
        all_present(&[&self.alibaba_api_key])
    }

    /// Tencent needs both the secret id and the secret key.
    pub fn is_valid_tencent(&self) -> bool {
        all_present(&[&self.tencent_secret_id, &self.tencent_secret_key])
    }

    pub fn is_valid_moonshot(&self) -> bool {
        all_present(&[&self.moonshot_api_key])
    }

    // iFlytek stores an api_secret as well, but only the key gates validity.
    pub fn is_valid_iflytek(&self) -> bool {
        all_present(&[&self.iflytek_api_key])
    }

    pub fn is_valid_deepseek(&self) -> bool {
        all_present(&[&self.deepseek_api_key])
    }

    pub fn is_valid_xai(&self) -> bool {
        all_present(&[&self.xai_api_key])
    }

    pub fn is_valid_chatglm(&self) -> bool {
        all_present(&[&self.chatglm_api_key])
    }

    pub fn is_valid_siliconflow(&self) -> bool {
        all_present(&[&self.siliconflow_api_key])
    }

    /// Validity of an arbitrary provider.
    pub fn is_valid_provider(&self, provider: ServiceProvider) -> bool {
        match provider {
            ServiceProvider::OpenAi => self.is_valid_openai(),
            ServiceProvider::Google => self.is_valid_google(),
            ServiceProvider::Anthropic => self.is_valid_anthropic(),
            ServiceProvider::Baidu => self.is_valid_baidu(),
            ServiceProvider::ByteDance => self.is_valid_bytedance(),
            ServiceProvider::Alibaba => self.is_valid_alibaba(),
            ServiceProvider::Tencent => self.is_valid_tencent(),
            ServiceProvider::Moonshot => self.is_valid_moonshot(),
            ServiceProvider::Iflytek => self.is_valid_iflytek(),
            ServiceProvider::DeepSeek => self.is_valid_deepseek(),
            ServiceProvider::Xai => self.is_valid_xai(),
            ServiceProvider::ChatGlm => self.is_valid_chatglm(),
            ServiceProvider::SiliconFlow => self.is_valid_siliconflow(),
        }
    }

    /// True when at least one provider has a usable credential.
    pub fn any_provider_valid(&self) -> bool {
        crate::provider::ALL_PROVIDERS.iter().any(|p| self.is_valid_provider(*p))
    }

    /// The stored endpoint URL for a provider. May be blank, meaning the
    /// build-mode default applies (resolved by the store).
    pub fn provider_url(&self, provider: ServiceProvider) -> &str {
        match provider {
            ServiceProvider::OpenAi => &self.openai_url,
            ServiceProvider::Google => &self.google_url,
            ServiceProvider::Anthropic => &self.anthropic_url,
            ServiceProvider::Baidu => &self.baidu_url,
            ServiceProvider::ByteDance => &self.bytedance_url,
            ServiceProvider::Alibaba => &self.alibaba_url,
            ServiceProvider::Tencent => &self.tencent_url,
            ServiceProvider::Moonshot => &self.moonshot_url,
            ServiceProvider::Iflytek => &self.iflytek_url,
            ServiceProvider::DeepSeek => &self.deepseek_url,
            ServiceProvider::Xai => &self.xai_url,
            ServiceProvider::ChatGlm => &self.chatglm_url,
            ServiceProvider::SiliconFlow => &self.siliconflow_url,
        }
    }
}

/// True when every value is non-empty after trimming.
fn all_present(values: &[&str]) -> bool {
    !values.is_empty() && values.iter().all(|v| !v.trim().is_empty())
}

/// Server-controlled subset of [`AccessState`], as returned by the hosting
/// server's config endpoint.
///
/// This is the explicit allow-list of fields the server may overwrite;
/// anything else in the response is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub need_code: Option<bool>,
    pub hide_user_api_key: Option<bool>,
    pub hide_balance_query: Option<bool>,
    pub disable_gpt4: Option<bool>,
    pub disable_fast_link: Option<bool>,
    pub custom_models: Option<String>,
    pub default_model: Option<String>,
    pub vision_models: Option<String>,
    pub edge_tts_voice_name: Option<String>,
}

impl ServerConfig {
    /// Overwrite the matching state fields. The server is authoritative for
    /// every key it sends.
    pub fn apply(&self, state: &mut AccessState) {
        if let Some(need_code) = self.need_code {
            state.need_code = need_code;
        }
        if let Some(hide_user_api_key) = self.hide_user_api_key {
            state.hide_user_api_key = hide_user_api_key;
        }
        if let Some(hide_balance_query) = self.hide_balance_query {
            state.hide_balance_query = hide_balance_query;
        }
        if let Some(disable_gpt4) = self.disable_gpt4 {
            state.disable_gpt4 = disable_gpt4;
        }
        if let Some(disable_fast_link) = self.disable_fast_link {
            state.disable_fast_link = disable_fast_link;
        }
        if let Some(ref custom_models) = self.custom_models {
            state.custom_models = custom_models.clone();
        }
        if let Some(ref default_model) = self.default_model {
            state.default_model = default_model.clone();
        }
        if let Some(ref vision_models) = self.vision_models {
            state.vision_models = vision_models.clone();
        }
        if let Some(ref voice) = self.edge_tts_voice_name {
            state.edge_tts_voice_name = voice.clone();
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
