use serde_json::Value;

/// The envelopes a vendor reply is known to arrive in.
#[derive(Debug, PartialEq)]
pub enum ResponseShape<'a> {
    /// `choices[0].message.content`; `None` when `message` has no content.
    ChatMessage(Option<&'a Value>),
    /// `choices[0].content`, only consulted when `message` is absent.
    FlatChoice(&'a Value),
    Unrecognized,
}

impl<'a> ResponseShape<'a> {
    pub fn classify(body: &'a Value) -> Self {
        let first = match body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
        {
            Some(first) => first,
            None => return ResponseShape::Unrecognized,
        };

        // message wins when both are present
        if let Some(message) = first.get("message") {
            return ResponseShape::ChatMessage(message.get("content"));
        }
        match first.get("content") {
            Some(content) => ResponseShape::FlatChoice(content),
            None => ResponseShape::Unrecognized,
        }
    }
}

fn content_to_text(content: &Value) -> Option<String> {
    match content {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn malformed(detail: &str) -> String {
    let msg = format!("Failed to parse response: {}", detail);
    log::error!("{}", msg);
    msg
}

/// Pulls the generated text out of a vendor reply. Never fails: an
/// unexpected body comes back as a diagnostic string that embeds it.
pub fn parse_response(body: &Value) -> String {
    match ResponseShape::classify(body) {
        ResponseShape::ChatMessage(Some(content)) => content_to_text(content)
            .unwrap_or_else(|| malformed("choices[0].message.content is null")),
        ResponseShape::ChatMessage(None) => {
            malformed("missing field `content` in choices[0].message")
        }
        ResponseShape::FlatChoice(content) => {
            content_to_text(content).unwrap_or_else(|| malformed("choices[0].content is null"))
        }
        ResponseShape::Unrecognized => format!("Unable to parse API response: {}", body),
    }
}
