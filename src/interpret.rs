//! Reads a raw `generateContent` outcome and decides whether it carries a
//! sketch.

use crate::error::{Result, SketchError};
use crate::models::{GenerateContentResponse, SketchImage};

/// The first inline image of the first candidate, or the reason there is none.
pub fn interpret_response(response: &GenerateContentResponse) -> Result<SketchImage> {
    let image_part = response
        .first_parts()
        .iter()
        .filter_map(|part| part.inline_data.as_ref())
        .find(|inline| !inline.mime_type.is_empty() && !inline.data.is_empty());

    if let Some(inline) = image_part {
        log::debug!(
            "Image part found: {} ({} base64 chars)",
            inline.mime_type,
            inline.data.len()
        );
        return Ok(SketchImage::new(&inline.mime_type, &inline.data));
    }

    let explanation = response
        .text()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .or_else(|| {
            response
                .block_reason()
                .map(|reason| format!("Prompt blocked by safety filter: {}", reason))
        });

    match explanation {
        Some(text) => {
            log::warn!("Model answered with text instead of an image: {}", text);
            Err(SketchError::ModelRefusal(text))
        }
        None => {
            log::warn!("Model returned neither an image nor an explanation");
            Err(SketchError::NoImageReturned)
        }
    }
}

/// Same as [`interpret_response`], but also accepts a failed invocation.
/// Failures are passed through unchanged except that anything carrying a
/// "failed to fetch" signature is normalized into [`SketchError::Network`].
pub fn interpret_outcome(
    outcome: Result<GenerateContentResponse>,
) -> Result<SketchImage> {
    match outcome {
        Ok(response) => interpret_response(&response),
        Err(err) if err.is_transport() => Err(err),
        Err(err) => {
            let message = err.to_string();
            if message.to_lowercase().contains("failed to fetch") {
                Err(SketchError::Network(message))
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_inline_image_becomes_data_uri() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
            ]}}]
        }));
        let image = interpret_response(&resp).unwrap();
        assert_eq!(image.to_data_uri(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_first_image_wins_over_text() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here you go" },
                { "inlineData": { "mimeType": "image/jpeg", "data": "BBBB" } },
                { "inlineData": { "mimeType": "image/png", "data": "CCCC" } }
            ]}}]
        }));
        let image = interpret_response(&resp).unwrap();
        assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,BBBB");
    }

    #[test]
    fn test_inline_data_without_media_type_is_skipped() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "data": "AAAA" } }
            ]}}]
        }));
        assert!(matches!(
            interpret_response(&resp),
            Err(SketchError::NoImageReturned)
        ));
    }

    #[test]
    fn test_text_only_is_model_refusal() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  content flagged \n" }] }}]
        }));
        match interpret_response(&resp) {
            Err(SketchError::ModelRefusal(detail)) => assert_eq!(detail, "content flagged"),
            other => panic!("expected refusal, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_text_is_no_image() {
        let resp = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] }}]
        }));
        assert!(matches!(
            interpret_response(&resp),
            Err(SketchError::NoImageReturned)
        ));
    }

    #[test]
    fn test_empty_response_is_no_image() {
        assert!(matches!(
            interpret_response(&GenerateContentResponse::default()),
            Err(SketchError::NoImageReturned)
        ));
        let resp = response(json!({ "candidates": [{ "finishReason": "STOP" }] }));
        assert!(matches!(
            interpret_response(&resp),
            Err(SketchError::NoImageReturned)
        ));
    }

    #[test]
    fn test_block_reason_is_refusal() {
        let resp = response(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        match interpret_response(&resp) {
            Err(SketchError::ModelRefusal(detail)) => assert!(detail.contains("SAFETY")),
            other => panic!("expected refusal, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_to_fetch_is_normalized() {
        let outcome = Err(SketchError::Response("TypeError: Failed To Fetch".into()));
        assert!(matches!(
            interpret_outcome(outcome),
            Err(SketchError::Network(_))
        ));
    }

    #[test]
    fn test_other_failures_pass_through() {
        let outcome = Err(SketchError::Api {
            status: 400,
            message: "API key not valid".into(),
        });
        assert!(matches!(
            interpret_outcome(outcome),
            Err(SketchError::Api { status: 400, .. })
        ));

        let outcome = Err(SketchError::Network("connection refused".into()));
        assert!(matches!(interpret_outcome(outcome), Err(SketchError::Network(_))));
    }
}
