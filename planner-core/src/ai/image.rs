//! Generated recipe images.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// An image carried as base64 data, renderable as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    mime_type: String,
    data: String,
}

impl ImageRef {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Wraps already-encoded data after checking that it decodes.
    pub fn from_base64(
        mime_type: impl Into<String>,
        data: &str,
    ) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(data)?;
        Ok(Self {
            mime_type: mime_type.into(),
            data: data.to_string(),
        })
    }

    /// Parses a `data:<mime>;base64,<data>` URI.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        Self::from_base64(mime_type, data).ok()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }

    /// File extension matching the mime type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}
