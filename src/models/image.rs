use crate::error::{Result, SketchError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// A generated sketch: base64 payload plus its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchImage {
    pub mime_type: String,
    pub data: String,
}

impl SketchImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn parse_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| SketchError::InvalidInput("not a data URI".into()))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| SketchError::InvalidInput("data URI is not base64 encoded".into()))?;
        if mime_type.is_empty() {
            return Err(SketchError::InvalidInput("data URI has no media type".into()));
        }
        Ok(Self::new(mime_type, data))
    }

    /// Raw bytes of the payload. The image itself is never inspected.
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| SketchError::Response(format!("invalid base64 image data: {}", e)))
    }

    pub fn file_extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    pub fn suggested_file_name(&self) -> String {
        format!("sketch.{}", self.file_extension())
    }

    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.decode()?;
        tokio::fs::write(path.as_ref(), bytes).await?;
        log::info!("💾 Sketch saved to {}", path.as_ref().display());
        Ok(())
    }
}
