use img2prompt::image2prompt::{DEFAULT_API_URL, DEFAULT_MODEL_NAME, DEFAULT_PROMPT};
use img2prompt::{node_class_mappings, ClientSettings, ImageToPromptNode, PromptConfig};
use mockito::Matcher;
use ndarray::Array4;

fn black_square() -> Array4<f32> {
    Array4::zeros((1, 2, 2, 3))
}

mod node_tests {
    use super::*;

    #[test]
    fn black_square_end_to_end() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v3/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""url":"data:image/png;base64,"#.to_string()),
                Matcher::Regex(r#""detail":"high""#.to_string()),
                Matcher::Regex(DEFAULT_PROMPT.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"a black square"}}]}"#)
            .create();

        let node = ImageToPromptNode::new();
        let result = node.image_to_prompt(
            &black_square(),
            &format!("{}/api/v3/chat/completions", server.url()),
            "sk-test",
            DEFAULT_MODEL_NAME,
            "high",
            DEFAULT_PROMPT,
        );

        assert_eq!(result, ("a black square".to_string(),));
        mock.assert();
    }

    #[test]
    fn flat_envelope_is_accepted() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"choices":[{"content":"flat reply"}]}"#)
            .create();

        let config = PromptConfig {
            api_url: server.url(),
            ..PromptConfig::default()
        };
        let (text,) = ImageToPromptNode::new().invoke(&black_square(), &config);
        assert_eq!(text, "flat reply");
    }

    #[test]
    fn empty_model_name_sends_default_model() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJsonString(
                r#"{"model":"doubao-1.5-vision-pro-250328"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create();

        let node = ImageToPromptNode::new();
        let (text,) = node.image_to_prompt(&black_square(), &server.url(), "k", "", "low", "p");
        assert_eq!(text, "ok");
        mock.assert();
    }

    #[test]
    fn unexpected_envelope_returns_diagnostic() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create();

        let node = ImageToPromptNode::new();
        let (text,) = node.image_to_prompt(&black_square(), &server.url(), "k", "", "auto", "p");
        assert!(text.contains(r#"{"choices":[]}"#), "{}", text);
    }

    #[test]
    fn server_error_is_reported_not_raised() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("POST", "/").with_status(503).create();

        let settings = ClientSettings::insecure();
        let node = ImageToPromptNode::with_settings(settings);
        let (text,) = node.image_to_prompt(&black_square(), &server.url(), "k", "", "high", "p");
        assert!(text.starts_with("API request error:"), "{}", text);
    }
}

mod registry_tests {
    use super::*;

    #[test]
    fn defaults_in_schema_match_config_defaults() {
        let registry = node_class_mappings();
        let info = registry.object_info();
        let required = &info["ImageToPrompt"]["input"]["required"];
        let defaults = PromptConfig::default();

        assert_eq!(required["api_url"][1]["default"], DEFAULT_API_URL);
        assert_eq!(required["api_url"][1]["default"], defaults.api_url.as_str());
        assert_eq!(required["custom_prompt"][1]["default"], defaults.custom_prompt.as_str());
        assert_eq!(required["model_name"][1]["default"], defaults.model_name.as_str());
        assert_eq!(required["detail_level"][0][0], defaults.detail_level.as_str());
    }
}
