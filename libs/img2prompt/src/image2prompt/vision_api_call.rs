use ndarray::{ArrayBase, Data, Dimension};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::PromptError;

use super::payload::{build_request, redact_headers, RequestPayload};
use super::response::parse_response;
use super::{ClientSettings, PromptConfig};

/// Sends one blocking POST and decodes the reply as JSON.
pub fn call_vision_model(
    settings: &ClientSettings,
    url: &str,
    headers: HeaderMap,
    payload: &RequestPayload,
) -> Result<Value, PromptError> {
    let client = settings.build_client()?;

    let response = client
        .post(url)
        .headers(headers)
        .json(payload)
        .send()?
        .error_for_status()?;

    let response_text = response.text()?;
    log::info!("API response: {}", response_text);

    Ok(serde_json::from_str(&response_text)?)
}

/// Encode, build, send, parse. Errors are returned, not stringified.
pub fn describe_image<S, D>(
    image: &ArrayBase<S, D>,
    config: &PromptConfig,
    settings: &ClientSettings,
) -> Result<String, PromptError>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let (headers, payload) = build_request(
        image,
        &config.custom_prompt,
        &config.model_name,
        config.detail_level.clone(),
        &config.api_key,
    )?;

    log::info!("Sending request to {}", config.api_url);
    log::info!("Request headers: {}", redact_headers(&headers));
    log::info!("Request body: {}", payload.log_summary());
    log::info!("Using image detail level: {}", config.detail_level);

    let body = call_vision_model(settings, &config.api_url, headers, &payload)?;
    Ok(parse_response(&body))
}

/// Same as [`describe_image`] but always yields a string: either the
/// description or a prefixed error message.
pub fn process_image_prompt<S, D>(
    image: &ArrayBase<S, D>,
    config: &PromptConfig,
    settings: &ClientSettings,
) -> String
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    match describe_image(image, config, settings) {
        Ok(text) => text,
        Err(e) => {
            let msg = e.to_node_output();
            log::error!("{}", msg);
            msg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;
    use std::time::Duration;

    fn config_for(url: String) -> PromptConfig {
        PromptConfig::new(url, "sk-test", "", "high", "describe")
    }

    #[test]
    fn chat_completion_reply_is_unwrapped() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v3/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model": "doubao-1.5-vision-pro-250328"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"a cat"}}]}"#)
            .create();

        let config = config_for(format!("{}/api/v3/chat/completions", server.url()));
        let tensor = Array4::<f32>::zeros((1, 2, 2, 3));
        let text = describe_image(&tensor, &config, &ClientSettings::default()).unwrap();

        assert_eq!(text, "a cat");
        mock.assert();
    }

    #[test]
    fn non_success_status_is_a_transport_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/")
            .with_status(401)
            .with_body(r#"{"error":"unauthorized"}"#)
            .create();

        let tensor = Array4::<f32>::zeros((1, 2, 2, 3));
        let out = process_image_prompt(&tensor, &config_for(server.url()), &ClientSettings::default());
        assert!(out.starts_with("API request error: "), "{}", out);
        assert!(out.contains("401"), "{}", out);
    }

    #[test]
    fn invalid_json_reply_is_a_processing_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create();

        let tensor = Array4::<f32>::zeros((1, 2, 2, 3));
        let out = process_image_prompt(&tensor, &config_for(server.url()), &ClientSettings::default());
        assert!(out.starts_with("Processing error: "), "{}", out);
    }

    #[test]
    fn slow_server_times_out() {
        // accepted by the kernel backlog but never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let settings = ClientSettings::new(Duration::from_millis(200), true);

        let tensor = Array4::<f32>::zeros((1, 2, 2, 3));
        let out = process_image_prompt(&tensor, &config_for(url), &settings);
        assert!(out.starts_with("API request error: "), "{}", out);
        drop(listener);
    }

    #[test]
    fn bad_tensor_never_reaches_the_network() {
        let tensor = Array4::<f32>::zeros((3, 2, 2, 3));
        let config = config_for("http://127.0.0.1:9/".to_string());
        let out = process_image_prompt(&tensor, &config, &ClientSettings::default());
        assert!(out.starts_with("Processing error: invalid image tensor"), "{}", out);
    }
}
