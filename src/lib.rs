//! Hand-drawn visual-note sketches from free-form text.
//!
//! A [`SketchRequest`] (text, optional title, aspect ratio, style and style
//! parameters) is turned into a Gemini image-generation call by
//! [`prompt::build_prompt`]; the raw response is read by
//! [`interpret::interpret_response`] into either a [`SketchImage`] or a
//! [`SketchError`], which [`classify`] maps to a displayable message.
//! Successful generations are kept in a [`SketchHistory`].

pub mod classify;
pub mod config;
pub mod error;
pub mod gemini;
pub mod history;
pub mod interpret;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod session;

pub use classify::{classify_message, ClassifiedError, ErrorKind};
pub use config::{Config, GeminiConfig};
pub use error::{Result, SketchError};
pub use gemini::{GeminiClient, ImageClient, ImageGenerator, SketchGenerator};
pub use history::{FileStore, KeyValueStore, MemoryStore, SketchHistory};
pub use models::*;
pub use prompt::{build_prompt, SketchPrompt};
pub use session::SketchSession;
