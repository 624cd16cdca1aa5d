use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

use crate::tensor::TensorError;

pub const TRANSPORT_ERROR_PREFIX: &str = "API request error: ";
pub const PROCESSING_ERROR_PREFIX: &str = "Processing error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// DNS or connection failure, timeout, non-2xx status.
    Transport,
    /// Everything that happens on this side of the wire.
    Processing,
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid image tensor: {0}")]
    Tensor(#[from] TensorError),
    #[error("failed to encode image as PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
    #[error("failed to decode API response as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PromptError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PromptError::Request(_) => ErrorCategory::Transport,
            PromptError::Tensor(_)
            | PromptError::Encode(_)
            | PromptError::Header(_)
            | PromptError::Json(_) => ErrorCategory::Processing,
        }
    }

    /// The string the node hands back to the host in place of a description.
    pub fn to_node_output(&self) -> String {
        let prefix = match self.category() {
            ErrorCategory::Transport => TRANSPORT_ERROR_PREFIX,
            ErrorCategory::Processing => PROCESSING_ERROR_PREFIX,
        };
        format!("{}{}", prefix, self)
    }
}

/// True when a node output is one of the error strings rather than a description.
pub fn is_error_output(text: &str) -> bool {
    text.starts_with(TRANSPORT_ERROR_PREFIX) || text.starts_with(PROCESSING_ERROR_PREFIX)
}
