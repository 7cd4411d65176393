use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::localization::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IdentificationMode {
    Packaging,
    Name,
    Chatbot,
}

/// Inline image sent to the model: base64 data plus its mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdentifyByImageInput {
    pub image: ImagePayload,
    pub prompt: String,
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct IdentifyByNameInput {
    pub name: String,
    pub prompt: String,
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_payload_encodes_bytes() {
        let payload = ImagePayload::from_bytes(b"hello", "image/png");
        assert_eq!(payload.data, "aGVsbG8=");
        assert_eq!(payload.mime_type, "image/png");
    }
}
