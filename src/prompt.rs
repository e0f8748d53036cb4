//! Turns the user's inputs into the instruction text and size directive sent
//! to the image model.
//!
//! Everything here is pure: the same inputs always produce byte-identical
//! output.

use crate::models::{
    AspectRatio, Content, GenerateContentRequest, GenerationConfig, ImageConfig, Part,
    SketchRequest, SketchStyle, StyleParams,
};

/// The image model is asked for both modalities so that a refusal comes back
/// as text instead of an empty candidate.
const RESPONSE_MODALITIES: [&str; 2] = ["IMAGE", "TEXT"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchPrompt {
    pub instruction_text: String,
    pub image_config: ImageConfig,
}

impl SketchPrompt {
    pub fn into_request(self, model: impl Into<String>) -> GenerateContentRequest {
        GenerateContentRequest {
            model: model.into(),
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(self.instruction_text)],
            }],
            generation_config: GenerationConfig {
                response_modalities: RESPONSE_MODALITIES.iter().map(|m| m.to_string()).collect(),
                image_config: self.image_config,
            },
        }
    }
}

impl SketchRequest {
    pub fn to_prompt(&self) -> SketchPrompt {
        build_prompt(
            &self.text,
            &self.title,
            self.aspect_ratio,
            self.style,
            &self.style_params,
        )
    }
}

/// Builds the prompt. `text` is expected to be non-empty after trimming;
/// callers validate that before getting here.
pub fn build_prompt(
    text: &str,
    title: &str,
    aspect_ratio: AspectRatio,
    style: SketchStyle,
    params: &StyleParams,
) -> SketchPrompt {
    let title = title.trim();
    let visual_style = style.visual_clause();
    let param_clauses = params.instruction_clauses(style).join(" ");
    let style_requirement = if param_clauses.is_empty() {
        visual_style.to_string()
    } else {
        format!("{} {}", visual_style, param_clauses)
    };

    let subject_instruction = if title.is_empty() {
        "Extract a clear, short subject from the text and display it in a large font as the \
         visual focal point."
            .to_string()
    } else {
        format!(
            "Use the provided title \"{}\" verbatim as the clear, short subject of the image and \
             display it in a large font as the visual focal point.",
            title
        )
    };

    let source_text = if title.is_empty() {
        text.to_string()
    } else {
        format!("Title: {}\nContent: {}", title, text)
    };

    let instruction_text = format!(
        r#"
# Role
You are a professional visual-note artist and information designer, and a careful letterer.

# Task
Based on the provided text, create a clear, concise, hand-drawn visual-note sketch. The image should have creative hand-drawn lettering, thin rounded lines and a striking artistic composition, with an avant-garde, minimal, high-end, masterpiece quality. The goal is to help the reader quickly grasp the internal logic and key points of the text.

# Steps
1. Read the text and extract its key nodes (actors / actions / results / conditions), organized by process or cause and effect.
2. {subject_instruction} Do not pack too much information into one sketch; avoid visual clutter.
3. Name the other key nodes with concise keywords.
4. Create the image according to the #Core requirements.
5. Make the result more concise.
6. Fill the canvas to keep visual balance; do not over-center the content.
7. **Final check**: before producing the final image, carefully verify the accuracy of every written word. Make sure there are no typos, missing letters or malformed characters of any kind. This is the most important step.

# Core requirements
- **Visual style**: strictly follow the hand-drawn style of visual notes. Every element should feel handwritten. {style_requirement}
- **Typography and text**: this is an absolute requirement: all text must be clear, accurate and well formed.
  - **Accuracy**: misspelled, distorted or illegible characters are strictly forbidden.
  - **Style**: use a clean, artistic handwritten typeface that matches the illustration.
  - **Legibility**: make sure the text is easy to read.
- **Composition and layout**: the layout must be clear, concise and logical and should guide the reader's eye naturally. It does not have to run strictly left-to-right or top-to-bottom; arrange elements freely with enough space between them. Strictly avoid crossing arrows so the image never looks messy.
- **Color**: use black for the main sketch lines to keep them crisp. Other colors (red for emphasis, green or yellow for decoration) are allowed, but keep the whole restrained. The background must be a high-contrast pure white. Do not use gradients, shadows, or photographic, 3D or realistic styles.
- **Size**: generate the image with an aspect ratio of {aspect_ratio}.

# Output goal
Produce a minimal hand-drawn sketch that clearly explains the core idea of the source text, so anyone who sees it quickly understands its main content.

# Source text to visualize
"{source_text}"
"#
    );

    SketchPrompt {
        instruction_text,
        image_config: ImageConfig {
            aspect_ratio: aspect_ratio.as_str().to_string(),
        },
    }
}
