use thiserror::Error;

/// Everything that can go wrong between collecting the user's text and
/// handing back a sketch.
///
/// The `Display` text of each variant is what the display layer in
/// [`crate::classify`] inspects, so the literal wording of `Network`,
/// `ModelRefusal` and `NoImageReturned` is load-bearing.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: unable to reach the image service ({0})")]
    Network(String),

    #[error("The model could not generate an image and returned this message: \"{0}\"")]
    ModelRefusal(String),

    #[error("The model did not return an image. Try phrasing your text differently.")]
    NoImageReturned,

    #[error("Image service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Response error: {0}")]
    Response(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl SketchError {
    /// True for failures where the request never got an answer from the service.
    pub fn is_transport(&self) -> bool {
        matches!(self, SketchError::Network(_))
    }
}

impl From<serde_json::Error> for SketchError {
    fn from(err: serde_json::Error) -> Self {
        SketchError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SketchError {
    fn from(err: std::io::Error) -> Self {
        SketchError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SketchError>;
