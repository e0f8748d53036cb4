//! Maps an error message to something a presentation layer can show.
//!
//! The rules are a best-effort keyword match over the message text,
//! evaluated top to bottom; the first hit wins. The structural kind of the
//! failure is deliberately not consulted, so any error string (including ones
//! produced outside this crate) can be classified the same way.

use crate::error::SketchError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ContentPolicy,
    NetworkError,
    GenerationFailed,
    Unknown,
}

/// A failure re-expressed for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub title: String,
    pub user_message: String,
    pub show_raw_detail: bool,
    pub raw_detail: Option<String>,
}

pub struct ClassificationRule {
    pub kind: ErrorKind,
    /// Lowercase needles; any one of them matching selects the rule.
    pub keywords: &'static [&'static str],
    pub title: &'static str,
    pub user_message: &'static str,
    pub show_raw_detail: bool,
}

impl ClassificationRule {
    pub fn matches(&self, lowercase_message: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowercase_message.contains(keyword))
    }
}

pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        kind: ErrorKind::ContentPolicy,
        keywords: &[
            "could not generate an image",
            "couldn't generate an image",
            "safety",
            "安全",
        ],
        title: "Content compliance issue",
        user_message: "The AI could not create an image from your prompt, possibly because of \
                       safety guidelines. Try phrasing it differently.",
        show_raw_detail: false,
    },
    ClassificationRule {
        kind: ErrorKind::NetworkError,
        keywords: &["network error", "failed to fetch", "网络"],
        title: "Network connection error",
        user_message: "Could not reach the sketch service. Check your network connection and \
                       try again.",
        show_raw_detail: false,
    },
    ClassificationRule {
        kind: ErrorKind::GenerationFailed,
        keywords: &["did not return an image", "未返回图像"],
        title: "Image generation failed",
        user_message: "The AI did not return a valid image for this prompt. Adjust your text \
                       slightly and try again.",
        show_raw_detail: true,
    },
];

const UNKNOWN_TITLE: &str = "Oops! Something went wrong.";
const UNKNOWN_MESSAGE: &str =
    "An unexpected error occurred. If the problem persists, check the details below.";

/// Classifies raw error text. Matching is a case-insensitive substring search.
pub fn classify_message(message: &str) -> ClassifiedError {
    if message.trim().is_empty() {
        return ClassifiedError {
            kind: ErrorKind::Unknown,
            title: "Error".to_string(),
            user_message: "An unknown error occurred.".to_string(),
            show_raw_detail: false,
            raw_detail: None,
        };
    }

    let lowercase = message.to_lowercase();
    let detail = Some(message.to_string());

    match CLASSIFICATION_RULES.iter().find(|rule| rule.matches(&lowercase)) {
        Some(rule) => ClassifiedError {
            kind: rule.kind,
            title: rule.title.to_string(),
            user_message: rule.user_message.to_string(),
            show_raw_detail: rule.show_raw_detail,
            raw_detail: detail,
        },
        None => ClassifiedError {
            kind: ErrorKind::Unknown,
            title: UNKNOWN_TITLE.to_string(),
            user_message: UNKNOWN_MESSAGE.to_string(),
            show_raw_detail: true,
            raw_detail: detail,
        },
    }
}

impl SketchError {
    pub fn classify(&self) -> ClassifiedError {
        classify_message(&self.to_string())
    }
}

impl ClassifiedError {
    /// The raw detail, only when the rule allows showing it.
    pub fn visible_detail(&self) -> Option<&str> {
        if self.show_raw_detail {
            self.raw_detail.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matching_rules(message: &str) -> Vec<ErrorKind> {
        let lowercase = message.to_lowercase();
        CLASSIFICATION_RULES
            .iter()
            .filter(|rule| rule.matches(&lowercase))
            .map(|rule| rule.kind)
            .collect()
    }

    #[test]
    fn test_interpreter_messages_match_exactly_one_rule() {
        let cases = [
            (
                SketchError::ModelRefusal("content flagged".into()),
                ErrorKind::ContentPolicy,
            ),
            (
                SketchError::Network("error sending request for url".into()),
                ErrorKind::NetworkError,
            ),
            (SketchError::NoImageReturned, ErrorKind::GenerationFailed),
        ];
        for (err, kind) in cases {
            assert_eq!(matching_rules(&err.to_string()), vec![kind], "{err}");
            assert_eq!(err.classify().kind, kind);
        }
    }

    #[test]
    fn test_refusal_is_content_policy_and_hides_detail() {
        let classified = SketchError::ModelRefusal("content flagged".into()).classify();
        assert_eq!(classified.title, "Content compliance issue");
        assert!(!classified.show_raw_detail);
        assert!(classified.visible_detail().is_none());
        assert!(classified
            .raw_detail
            .as_deref()
            .unwrap()
            .contains("content flagged"));
    }

    #[test]
    fn test_failed_to_fetch_any_casing() {
        for message in ["Failed to fetch", "TypeError: FAILED TO FETCH", "failed to fetch"] {
            let classified = classify_message(message);
            assert_eq!(classified.kind, ErrorKind::NetworkError);
            assert_eq!(classified.title, "Network connection error");
            assert!(!classified.show_raw_detail);
        }
    }

    #[test]
    fn test_no_image_shows_detail() {
        let classified = SketchError::NoImageReturned.classify();
        assert_eq!(classified.kind, ErrorKind::GenerationFailed);
        assert_eq!(classified.title, "Image generation failed");
        assert!(classified.visible_detail().is_some());
    }

    #[test]
    fn test_content_policy_takes_precedence() {
        // mentions both safety and a network error; the first rule wins
        let classified = classify_message("network error while reading safety verdict");
        assert_eq!(classified.kind, ErrorKind::ContentPolicy);
    }

    #[test]
    fn test_chinese_error_text_from_saved_history() {
        let cases = [
            ("无法生成图像：违反安全准则", ErrorKind::ContentPolicy),
            ("网络错误：无法连接到 AI 服务。请检查您的网络连接。", ErrorKind::NetworkError),
            ("AI 模型未返回图像。请尝试换一种说法。", ErrorKind::GenerationFailed),
        ];
        for (message, kind) in cases {
            assert_eq!(classify_message(message).kind, kind, "{message}");
        }
    }

    #[test]
    fn test_unmatched_message_is_unknown() {
        let err = SketchError::Api {
            status: 500,
            message: "internal".into(),
        };
        let classified = err.classify();
        assert_eq!(classified.kind, ErrorKind::Unknown);
        assert!(classified.show_raw_detail);
        assert_eq!(
            classified.visible_detail(),
            Some("Image service returned HTTP 500: internal")
        );
    }

    #[test]
    fn test_empty_message() {
        let classified = classify_message("  ");
        assert_eq!(classified.kind, ErrorKind::Unknown);
        assert_eq!(classified.title, "Error");
        assert!(classified.raw_detail.is_none());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let message = "The model did not return an image.";
        assert_eq!(classify_message(message), classify_message(message));
    }
}
