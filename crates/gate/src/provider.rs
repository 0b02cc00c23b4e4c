// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service provider registry: the AI backends a client can talk to, with
//! their direct base URLs (exported builds) and hosted proxy paths.

use serde::{Deserialize, Serialize};

use crate::config::BuildMode;

/// A supported AI backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceProvider {
    #[default]
    OpenAi,
    Google,
    Anthropic,
    Baidu,
    ByteDance,
    Alibaba,
    Tencent,
    Moonshot,
    Iflytek,
    DeepSeek,
    Xai,
    ChatGlm,
    SiliconFlow,
}

/// All providers, in display order.
pub const ALL_PROVIDERS: [ServiceProvider; 13] = [
    ServiceProvider::OpenAi,
    ServiceProvider::Google,
    ServiceProvider::Anthropic,
    ServiceProvider::Baidu,
    ServiceProvider::ByteDance,
    ServiceProvider::Alibaba,
    ServiceProvider::Tencent,
    ServiceProvider::Moonshot,
    ServiceProvider::Iflytek,
    ServiceProvider::DeepSeek,
    ServiceProvider::Xai,
    ServiceProvider::ChatGlm,
    ServiceProvider::SiliconFlow,
];

impl ServiceProvider {
    /// Human-readable provider name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Google => "Google",
            Self::Anthropic => "Anthropic",
            Self::Baidu => "Baidu",
            Self::ByteDance => "ByteDance",
            Self::Alibaba => "Alibaba",
            Self::Tencent => "Tencent",
            Self::Moonshot => "Moonshot",
            Self::Iflytek => "iFlytek",
            Self::DeepSeek => "DeepSeek",
            Self::Xai => "XAI",
            Self::ChatGlm => "ChatGLM",
            Self::SiliconFlow => "SiliconFlow",
        }
    }

    /// Direct upstream base URL, used by exported/offline builds.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com",
            Self::Google => "https://generativelanguage.googleapis.com/",
            Self::Anthropic => "https://api.anthropic.com",
            Self::Baidu => "https://aip.baidubce.com",
            Self::ByteDance => "https://ark.cn-beijing.volces.com",
            Self::Alibaba => "https://dashscope.aliyuncs.com",
            Self::Tencent => "https://hunyuan.tencentcloudapi.com",
            Self::Moonshot => "https://api.moonshot.cn",
            Self::Iflytek => "https://spark-api-open.xf-yun.com",
            Self::DeepSeek => "https://api.deepseek.com",
            Self::Xai => "https://api.x.ai",
            Self::ChatGlm => "https://open.bigmodel.cn",
            Self::SiliconFlow => "https://api.siliconflow.cn",
        }
    }

    /// Local proxy path, used when the client is served by a hosting server.
    pub fn proxy_path(&self) -> &'static str {
        match self {
            Self::OpenAi => "/api/openai",
            Self::Google => "/api/google",
            Self::Anthropic => "/api/anthropic",
            Self::Baidu => "/api/baidu",
            Self::ByteDance => "/api/bytedance",
            Self::Alibaba => "/api/alibaba",
            Self::Tencent => "/api/tencent",
            Self::Moonshot => "/api/moonshot",
            Self::Iflytek => "/api/iflytek",
            Self::DeepSeek => "/api/deepseek",
            Self::Xai => "/api/xai",
            Self::ChatGlm => "/api/chatglm",
            Self::SiliconFlow => "/api/siliconflow",
        }
    }

    /// Default endpoint for the given build mode: exported builds call the
    /// provider directly, hosted builds go through the local proxy.
    pub fn default_endpoint(&self, mode: BuildMode) -> &'static str {
        match mode {
            BuildMode::Export => self.base_url(),
            BuildMode::Hosted => self.proxy_path(),
        }
    }
}

impl std::fmt::Display for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => f.write_str("openai"),
            Self::Google => f.write_str("google"),
            Self::Anthropic => f.write_str("anthropic"),
            Self::Baidu => f.write_str("baidu"),
            Self::ByteDance => f.write_str("bytedance"),
            Self::Alibaba => f.write_str("alibaba"),
            Self::Tencent => f.write_str("tencent"),
            Self::Moonshot => f.write_str("moonshot"),
            Self::Iflytek => f.write_str("iflytek"),
            Self::DeepSeek => f.write_str("deepseek"),
            Self::Xai => f.write_str("xai"),
            Self::ChatGlm => f.write_str("chatglm"),
            Self::SiliconFlow => f.write_str("siliconflow"),
        }
    }
}

impl std::str::FromStr for ServiceProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "google" | "gemini" => Ok(Self::Google),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "baidu" => Ok(Self::Baidu),
            "bytedance" => Ok(Self::ByteDance),
            "alibaba" => Ok(Self::Alibaba),
            "tencent" => Ok(Self::Tencent),
            "moonshot" => Ok(Self::Moonshot),
            "iflytek" => Ok(Self::Iflytek),
            "deepseek" => Ok(Self::DeepSeek),
            "xai" => Ok(Self::Xai),
            "chatglm" => Ok(Self::ChatGlm),
            "siliconflow" => Ok(Self::SiliconFlow),
            other => anyhow::bail!("unknown provider: {other}"),
        }
    }
}

/// Google content-safety threshold forwarded with Gemini requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoogleSafetySetting {
    BlockNone,
    #[default]
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
