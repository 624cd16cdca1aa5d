use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use img2prompt::error::is_error_output;
use img2prompt::tensor::base64_to_tensor;
use img2prompt::{node_class_mappings, ClientSettings, ImageToPromptNode, PromptConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: ClientSettings,
}

#[derive(Deserialize)]
pub struct PromptRequest {
    /// Base64 image bytes, optionally as a `data:` URI.
    pub image: String,
    #[serde(flatten)]
    pub config: PromptConfig,
}

#[derive(Serialize)]
pub struct PromptResponse {
    pub result: String,
    pub is_error: bool,
}

pub fn app(settings: ClientSettings) -> Router {
    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .route("/health", get(|| async { "healthy" }))
        .route("/object_info", get(object_info))
        .route("/image-to-prompt", post(image_to_prompt))
        .with_state(AppState { settings })
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
}

// Transport settings belong to the server, never to the caller.
fn node_for(state: &AppState) -> ImageToPromptNode {
    ImageToPromptNode::with_settings(state.settings.clone())
}

async fn object_info() -> Json<Value> {
    Json(node_class_mappings().object_info())
}

async fn image_to_prompt(
    State(state): State<AppState>,
    Json(payload): Json<PromptRequest>,
) -> impl IntoResponse {
    let tensor = match base64_to_tensor(&payload.image) {
        Ok(tensor) => tensor,
        Err(err) => {
            log::error!("Rejecting request: {}", err);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<PromptResponse>::error(err.to_string())),
            );
        }
    };
    log::info!("Received image tensor {:?}", tensor.shape());

    let node = node_for(&state);
    let config = payload.config;

    // reqwest's blocking client must stay off the async workers
    match tokio::task::spawn_blocking(move || node.invoke(&tensor, &config)).await {
        Ok((result,)) => {
            let is_error = is_error_output(&result);
            (
                StatusCode::OK,
                Json(ApiResponse::ok(PromptResponse { result, is_error })),
            )
        }
        Err(err) => {
            log::error!("Node task failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Node task failed: {}", err))),
            )
        }
    }
}
