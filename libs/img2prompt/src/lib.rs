pub mod common;
pub mod error;
pub mod image2prompt;
pub mod node;
pub mod tensor;

pub use error::{ErrorCategory, PromptError};
pub use image2prompt::{build_request, parse_response, ClientSettings, PromptConfig};
pub use node::{node_class_mappings, ImageToPromptNode, NodeRegistry};
