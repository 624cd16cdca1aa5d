use ndarray::{ArrayBase, Data, Dimension};

use crate::common::DetailLevel;
use crate::image2prompt::{
    process_image_prompt, ClientSettings, PromptConfig, DEFAULT_API_URL, DEFAULT_MODEL_NAME,
    DEFAULT_PROMPT,
};

use super::types::{InputKind, InputSpec, NodeDefinition};

/// Turns an image into a text prompt through a vision chat-completion API.
///
/// Holds nothing but transport settings, so one instance can serve any
/// number of invocations from any thread.
#[derive(Clone, Debug, Default)]
pub struct ImageToPromptNode {
    settings: ClientSettings,
}

impl ImageToPromptNode {
    pub const CLASS_NAME: &'static str = "ImageToPrompt";
    pub const DISPLAY_NAME: &'static str = "图像到关键词";
    pub const CATEGORY: &'static str = "分析/反向推导";
    pub const FUNCTION: &'static str = "image_to_prompt";
    pub const RETURN_TYPES: &'static [&'static str] = &["STRING"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ClientSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn definition() -> NodeDefinition {
        NodeDefinition {
            class_name: Self::CLASS_NAME,
            display_name: Self::DISPLAY_NAME,
            category: Self::CATEGORY,
            function: Self::FUNCTION,
            return_types: Self::RETURN_TYPES,
            inputs: vec![
                InputSpec::new("image", InputKind::Image),
                InputSpec::new(
                    "model_name",
                    InputKind::String {
                        default: DEFAULT_MODEL_NAME,
                        multiline: false,
                    },
                ),
                InputSpec::new("detail_level", InputKind::Choice(&DetailLevel::CHOICES)),
                InputSpec::new(
                    "api_url",
                    InputKind::String {
                        default: DEFAULT_API_URL,
                        multiline: false,
                    },
                ),
                InputSpec::new(
                    "api_key",
                    InputKind::String {
                        default: "",
                        multiline: false,
                    },
                ),
                InputSpec::new(
                    "custom_prompt",
                    InputKind::String {
                        default: DEFAULT_PROMPT,
                        multiline: true,
                    },
                ),
            ],
        }
    }

    /// The node's single entry point. Always returns exactly one string:
    /// the description, or an `API request error: ` / `Processing error: `
    /// message.
    pub fn image_to_prompt<S, D>(
        &self,
        image: &ArrayBase<S, D>,
        api_url: &str,
        api_key: &str,
        model_name: &str,
        detail_level: impl Into<DetailLevel>,
        custom_prompt: &str,
    ) -> (String,)
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        let config = PromptConfig::new(api_url, api_key, model_name, detail_level, custom_prompt);
        self.invoke(image, &config)
    }

    pub fn invoke<S, D>(&self, image: &ArrayBase<S, D>, config: &PromptConfig) -> (String,)
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        (process_image_prompt(image, config, &self.settings),)
    }
}
