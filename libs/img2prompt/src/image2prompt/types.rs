use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::DetailLevel;

pub const DEFAULT_MODEL_NAME: &str = "doubao-1.5-vision-pro-250328";
pub const DEFAULT_API_URL: &str = "https://ark.cn-beijing.volces.com/api/v3/chat/completions";
pub const DEFAULT_PROMPT: &str = "描述这张图片，关注以下方面：主体、风格、光线、色彩、构图、细节";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call inputs of the node, everything except the image itself.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
    pub detail_level: DetailLevel,
    pub custom_prompt: String,
}

impl PromptConfig {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
        detail_level: impl Into<DetailLevel>,
        custom_prompt: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model_name: model_name.into(),
            detail_level: detail_level.into(),
            custom_prompt: custom_prompt.into(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            detail_level: DetailLevel::High,
            custom_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

// Hand-written so the key never ends up in a log line through `{:?}`.
impl std::fmt::Debug for PromptConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("detail_level", &self.detail_level)
            .field("custom_prompt", &self.custom_prompt)
            .finish()
    }
}

/// Transport settings shared by every call a node makes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub verify_tls: bool,
}

impl ClientSettings {
    pub fn new(timeout: Duration, verify_tls: bool) -> Self {
        Self { timeout, verify_tls }
    }

    pub fn insecure() -> Self {
        Self {
            verify_tls: false,
            ..Self::default()
        }
    }

    pub fn build_client(&self) -> reqwest::Result<reqwest::blocking::Client> {
        if !self.verify_tls {
            log::warn!("TLS certificate verification is disabled");
        }
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
        }
    }
}
