use ndarray::{ArrayBase, Data, Dimension};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::common::DetailLevel;
use crate::error::PromptError;
use crate::tensor::tensor_to_png_base64;

use super::DEFAULT_MODEL_NAME;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub model: String,
    pub messages: Vec<Message>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<Content>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: DetailLevel,
}

impl RequestPayload {
    /// One user message: the instruction text, then the PNG as a data URI.
    pub fn new(model_name: &str, prompt: &str, image_base64: &str, detail: DetailLevel) -> Self {
        let model = if model_name.is_empty() {
            DEFAULT_MODEL_NAME
        } else {
            model_name
        };

        Self {
            model: model.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    Content::Text {
                        text: prompt.to_string(),
                    },
                    Content::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("{}{}", PNG_DATA_URI_PREFIX, image_base64),
                            detail,
                        },
                    },
                ],
            }],
        }
    }

    pub fn image_url(&self) -> Option<&ImageUrl> {
        self.messages
            .iter()
            .flat_map(|m| m.content.iter())
            .find_map(|c| match c {
                Content::ImageUrl { image_url } => Some(image_url),
                Content::Text { .. } => None,
            })
    }

    /// The body as JSON with the base64 image cut down to its length.
    pub fn log_summary(&self) -> String {
        let mut summary = self.clone();
        for message in summary.messages.iter_mut() {
            for content in message.content.iter_mut() {
                if let Content::ImageUrl { image_url } = content {
                    let encoded = image_url.url.len().saturating_sub(PNG_DATA_URI_PREFIX.len());
                    image_url.url = format!("{}<{} base64 chars>", PNG_DATA_URI_PREFIX, encoded);
                }
            }
        }
        serde_json::to_string(&summary).unwrap_or_else(|e| format!("<unserializable body: {}>", e))
    }
}

pub fn build_headers(api_key: &str) -> Result<HeaderMap, PromptError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut authorization = HeaderValue::from_str(&format!("Bearer {}", api_key))?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);

    Ok(headers)
}

/// Renders headers for logging, with sensitive values masked.
pub fn redact_headers(headers: &HeaderMap) -> String {
    let fields: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            let shown = if value.is_sensitive() {
                "<redacted>"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{}: {}", name, shown)
        })
        .collect();
    format!("{{{}}}", fields.join(", "))
}

/// Encodes the tensor and assembles headers and body. No I/O.
pub fn build_request<S, D>(
    image: &ArrayBase<S, D>,
    prompt: &str,
    model_name: &str,
    detail: DetailLevel,
    api_key: &str,
) -> Result<(HeaderMap, RequestPayload), PromptError>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let image_base64 = tensor_to_png_base64(image)?;
    let headers = build_headers(api_key)?;
    let payload = RequestPayload::new(model_name, prompt, &image_base64, detail);
    Ok((headers, payload))
}
