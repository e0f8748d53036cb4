use super::sketch::{AspectRatio, SketchRequest, SketchStyle, StyleParams};
use serde::{Deserialize, Serialize};

/// One past generation: the inputs that produced it and the resulting image
/// as a data URI. Entries are never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub input_text: String,
    #[serde(default)]
    pub sketch_title: String,
    pub image_url: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub style: SketchStyle,
    #[serde(default)]
    pub style_params: StyleParams,
}

impl HistoryEntry {
    pub fn new(id: i64, request: &SketchRequest, image_url: impl Into<String>) -> Self {
        Self {
            id,
            input_text: request.text.clone(),
            sketch_title: request.title.clone(),
            image_url: image_url.into(),
            aspect_ratio: request.aspect_ratio,
            style: request.style,
            style_params: request.style_params,
        }
    }

    /// The inputs of this entry, ready to be edited or generated again.
    pub fn to_request(&self) -> SketchRequest {
        SketchRequest {
            text: self.input_text.clone(),
            title: self.sketch_title.clone(),
            aspect_ratio: self.aspect_ratio,
            style: self.style,
            style_params: self.style_params,
        }
    }

    /// Title if there is one, otherwise the start of the text.
    pub fn display_label(&self) -> String {
        if self.sketch_title.trim().is_empty() {
            self.input_text.chars().take(50).collect()
        } else {
            self.sketch_title.clone()
        }
    }

    pub fn badges(&self) -> Vec<&str> {
        let mut badges = vec![self.aspect_ratio.as_str(), self.style.as_str()];
        badges.extend(self.style_params.non_default_labels());
        badges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sketch::LineWeight;

    #[test]
    fn test_camel_case_round_shape() {
        let request = SketchRequest::new("ship it").with_title("Launch");
        let entry = HistoryEntry::new(1_700_000_000_000, &request, "data:image/png;base64,AAAA");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["inputText"], "ship it");
        assert_eq!(value["sketchTitle"], "Launch");
        assert_eq!(value["imageUrl"], "data:image/png;base64,AAAA");
        assert_eq!(value["aspectRatio"], "9:16");
        assert_eq!(value["style"], "colored-pencil");
        assert_eq!(value["styleParams"]["lineWeight"], "regular");
    }

    #[test]
    fn test_missing_style_params_restore_defaults() {
        let json = r#"{"id":5,"inputText":"a","sketchTitle":"","imageUrl":"data:image/png;base64,AA","aspectRatio":"1:1","style":"木炭"}"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.style_params, StyleParams::default());
        assert_eq!(entry.style, SketchStyle::ColoredPencil);
        assert_eq!(entry.to_request().aspect_ratio, AspectRatio::Square);
    }

    #[test]
    fn test_label_and_badges() {
        let long_text = "x".repeat(80);
        let request = SketchRequest::new(long_text)
            .with_style(SketchStyle::Pencil)
            .with_style_params(StyleParams::default().with_line_weight(LineWeight::Bold));
        let entry = HistoryEntry::new(1, &request, "data:image/png;base64,AA");
        assert_eq!(entry.display_label().len(), 50);
        assert_eq!(entry.badges(), vec!["9:16", "pencil", "bold"]);
    }
}
