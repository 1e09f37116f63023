//! Request encoding and response decoding for `POST /api/generate`.
//!
//! Field names are a wire contract with the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::ContextBuffer;
use crate::error::DecodeError;

/// The body of one generate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePayload {
    /// Model identifier, e.g. `qwen2.5-coder:7b`
    pub model: String,

    /// Full prompt: transcript plus the current user turn
    pub prompt: String,

    /// Always `false`; streaming responses are not handled
    pub stream: bool,
}

/// Build the payload for `user_text` on top of `context`.
pub fn encode(model: &str, context: &ContextBuffer, user_text: &str) -> GeneratePayload {
    GeneratePayload {
        model: model.to_string(),
        prompt: context.render_prompt(user_text),
        stream: false,
    }
}

/// Extract the reply text from a 200 response body.
///
/// The body must be a JSON object with a string `response` field. Other
/// fields are ignored.
pub fn decode_reply(body: &str) -> Result<String, DecodeError> {
    let Value::Object(mut fields) = serde_json::from_str::<Value>(body)? else {
        return Err(DecodeError("expected a JSON object".into()));
    };

    match fields.remove("response") {
        Some(Value::String(reply)) => Ok(reply),
        Some(other) => Err(DecodeError(format!("field `response` is not a string: {other}"))),
        None => Err(DecodeError("missing field `response`".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_with_fixed_field_names() {
        let mut ctx = ContextBuffer::default();
        ctx.append("a", "b");
        let payload = encode("qwen2.5-coder:7b", &ctx, "hello");

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "qwen2.5-coder:7b",
                "prompt": "\n[User]:a\n[AI]:b\n[User]:hello[AI]:",
                "stream": false,
            })
        );
    }

    #[test]
    fn encode_does_not_touch_context() {
        let ctx = ContextBuffer::default();
        let _ = encode("m", &ctx, "hello");
        assert!(ctx.is_empty());
    }

    #[test]
    fn decode_reads_response_field() {
        assert_eq!(decode_reply(r#"{"response":"hi"}"#).unwrap(), "hi");
    }

    #[test]
    fn decode_ignores_extra_ollama_fields() {
        let body = r#"{"model":"qwen2.5-coder:7b","created_at":"2024-01-01T00:00:00Z","response":"hey","done":true}"#;
        assert_eq!(decode_reply(body).unwrap(), "hey");
    }

    #[test]
    fn decode_rejects_invalid_json() {
        assert!(decode_reply("<html>Bad Gateway</html>").is_err());
    }

    #[test]
    fn decode_rejects_missing_field() {
        let err = decode_reply(r#"{"error":"model not found"}"#).unwrap_err();
        assert!(err.0.contains("response"));
    }

    #[test]
    fn decode_rejects_non_string_response() {
        assert!(decode_reply(r#"{"response":42}"#).is_err());
        assert!(decode_reply(r#"{"response":null}"#).is_err());
    }

    #[test]
    fn decode_rejects_non_object_bodies() {
        assert!(decode_reply(r#"["hi"]"#).is_err());
        assert!(decode_reply(r#"["response"]"#).is_err());
        assert!(decode_reply(r#""hi""#).is_err());
        assert!(decode_reply("42").is_err());
    }
}
