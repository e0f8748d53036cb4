use crate::error::{Result, SketchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target geometry of the generated image.
///
/// Parsing user input is strict. Deserialization is lenient: a ratio outside
/// the supported set resolves to the default so saved history still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Classic4x3,
    #[serde(rename = "9:21")]
    Tall9x21,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape16x9,
        AspectRatio::Square,
        AspectRatio::Classic4x3,
        AspectRatio::Tall9x21,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Square => "1:1",
            AspectRatio::Classic4x3 => "4:3",
            AspectRatio::Tall9x21 => "9:21",
        }
    }

    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!(
                "Unsupported aspect ratio '{}', falling back to {}",
                name,
                AspectRatio::default()
            );
            AspectRatio::default()
        })
    }
}

impl From<String> for AspectRatio {
    fn from(name: String) -> Self {
        AspectRatio::resolve(&name)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == wanted)
            .ok_or_else(|| {
                SketchError::InvalidInput(format!(
                    "unsupported aspect ratio '{}', expected one of 9:16, 16:9, 1:1, 4:3, 9:21",
                    s
                ))
            })
    }
}

/// Secondary knobs a style may honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleParamKey {
    LineWeight,
    Saturation,
}

/// Rendering aesthetic of the sketch.
///
/// Parsing never fails: any name outside the three known styles resolves to
/// [`SketchStyle::ColoredPencil`]. Deserialization goes through the same path
/// so history written by other tools still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum SketchStyle {
    #[default]
    ColoredPencil,
    Pencil,
    Charcoal,
}

impl SketchStyle {
    pub const ALL: [SketchStyle; 3] = [
        SketchStyle::ColoredPencil,
        SketchStyle::Pencil,
        SketchStyle::Charcoal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SketchStyle::ColoredPencil => "colored-pencil",
            SketchStyle::Pencil => "pencil",
            SketchStyle::Charcoal => "charcoal",
        }
    }

    pub fn resolve(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let found = SketchStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .or_else(|| SketchStyle::from_legacy_name(name.trim()));
        match found {
            Some(style) => style,
            None => {
                log::debug!(
                    "Unknown sketch style '{}', falling back to {}",
                    name,
                    SketchStyle::ColoredPencil
                );
                SketchStyle::ColoredPencil
            }
        }
    }

    /// Style names found in history written by the Chinese-language web app.
    fn from_legacy_name(name: &str) -> Option<Self> {
        match name {
            "彩色铅笔" => Some(SketchStyle::ColoredPencil),
            "铅笔" => Some(SketchStyle::Pencil),
            "木炭" => Some(SketchStyle::Charcoal),
            _ => None,
        }
    }

    /// Fixed descriptive paragraph injected into the visual-style requirement.
    pub fn visual_clause(&self) -> &'static str {
        match self {
            SketchStyle::ColoredPencil => {
                "Use clean, minimal lines paired with simple icons. The overall feel should be \
                 of colored pencils drawn on a whiteboard or notebook page."
            }
            SketchStyle::Pencil => {
                "Use clean, minimal graphite pencil lines that read like a rough sketch, \
                 working mainly in grey and black tones."
            }
            SketchStyle::Charcoal => {
                "Use expressive charcoal strokes with strong light-dark contrast and a dramatic \
                 effect, suited to emotionally rich sketches."
            }
        }
    }

    pub fn honored_params(&self) -> &'static [StyleParamKey] {
        match self {
            SketchStyle::ColoredPencil => &[StyleParamKey::Saturation],
            SketchStyle::Pencil | SketchStyle::Charcoal => &[StyleParamKey::LineWeight],
        }
    }

    pub fn honors(&self, key: StyleParamKey) -> bool {
        self.honored_params().contains(&key)
    }
}

impl From<String> for SketchStyle {
    fn from(name: String) -> Self {
        SketchStyle::resolve(&name)
    }
}

impl FromStr for SketchStyle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(SketchStyle::resolve(s))
    }
}

impl fmt::Display for SketchStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineWeight {
    Thin,
    #[default]
    Regular,
    Bold,
}

impl LineWeight {
    /// Modifier text, or `None` for the default weight.
    pub fn clause(&self) -> Option<&'static str> {
        match self {
            LineWeight::Thin => Some("Use thin, light lines."),
            LineWeight::Regular => None,
            LineWeight::Bold => Some("Use bold, heavy, forceful lines."),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineWeight::Thin => "thin",
            LineWeight::Regular => "regular",
            LineWeight::Bold => "bold",
        }
    }
}

impl FromStr for LineWeight {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thin" => Ok(LineWeight::Thin),
            "regular" => Ok(LineWeight::Regular),
            "bold" => Ok(LineWeight::Bold),
            other => Err(SketchError::InvalidInput(format!(
                "unknown line weight '{}', expected thin, regular or bold",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Saturation {
    Low,
    #[default]
    Medium,
    High,
}

impl Saturation {
    /// Modifier text, or `None` for the default saturation.
    pub fn clause(&self) -> Option<&'static str> {
        match self {
            Saturation::Low => Some("Keep color saturation low for a soft, faded look."),
            Saturation::Medium => None,
            Saturation::High => Some("Keep color saturation high for vivid, bright colors."),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Saturation::Low => "low",
            Saturation::Medium => "medium",
            Saturation::High => "high",
        }
    }
}

impl FromStr for Saturation {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Saturation::Low),
            "medium" => Ok(Saturation::Medium),
            "high" => Ok(Saturation::High),
            other => Err(SketchError::InvalidInput(format!(
                "unknown saturation '{}', expected low, medium or high",
                other
            ))),
        }
    }
}

/// Style modifiers. Both keys are always stored; only the ones the active
/// style honors reach the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_weight: Option<LineWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<Saturation>,
}

impl Default for StyleParams {
    fn default() -> Self {
        StyleParams {
            line_weight: Some(LineWeight::Regular),
            saturation: Some(Saturation::Medium),
        }
    }
}

impl StyleParams {
    /// No values at all, as opposed to the explicit defaults of [`StyleParams::default`].
    pub fn empty() -> Self {
        StyleParams {
            line_weight: None,
            saturation: None,
        }
    }

    pub fn with_line_weight(mut self, weight: LineWeight) -> Self {
        self.line_weight = Some(weight);
        self
    }

    pub fn with_saturation(mut self, saturation: Saturation) -> Self {
        self.saturation = Some(saturation);
        self
    }

    /// Modifier clauses for `style`, in key order, skipping defaults and
    /// keys the style does not honor.
    pub fn instruction_clauses(&self, style: SketchStyle) -> Vec<&'static str> {
        style
            .honored_params()
            .iter()
            .filter_map(|key| match key {
                StyleParamKey::LineWeight => self.line_weight.and_then(|w| w.clause()),
                StyleParamKey::Saturation => self.saturation.and_then(|s| s.clause()),
            })
            .collect()
    }

    /// Non-default values, as short labels for history badges.
    pub fn non_default_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if let Some(weight) = self.line_weight.filter(|w| *w != LineWeight::Regular) {
            labels.push(weight.as_str());
        }
        if let Some(saturation) = self.saturation.filter(|s| *s != Saturation::Medium) {
            labels.push(saturation.as_str());
        }
        labels
    }
}

/// The five inputs the user picks before generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchRequest {
    pub text: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub style: SketchStyle,
    #[serde(default)]
    pub style_params: StyleParams,
}

impl SketchRequest {
    pub fn new(text: impl Into<String>) -> Self {
        SketchRequest {
            text: text.into(),
            title: String::new(),
            aspect_ratio: AspectRatio::default(),
            style: SketchStyle::default(),
            style_params: StyleParams::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_style(mut self, style: SketchStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_style_params(mut self, params: StyleParams) -> Self {
        self.style_params = params;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(SketchError::InvalidInput(
                "text to visualize must not be empty".into(),
            ));
        }
        Ok(())
    }
}
