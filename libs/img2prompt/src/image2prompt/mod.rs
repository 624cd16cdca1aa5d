mod payload;
mod response;
mod types;
mod vision_api_call;

pub use payload::{build_headers, build_request, redact_headers, Content, ImageUrl, Message, RequestPayload};
pub use response::{parse_response, ResponseShape};
pub use types::{
    ClientSettings, PromptConfig, DEFAULT_API_URL, DEFAULT_MODEL_NAME, DEFAULT_PROMPT,
    DEFAULT_TIMEOUT,
};
pub use vision_api_call::{call_vision_model, describe_image, process_image_prompt};
