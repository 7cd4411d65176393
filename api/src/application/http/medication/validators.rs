use kurdmed_core::domain::localization::Language;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct IdentifyByNameRequest {
    #[validate(length(max = 200, message = "name must be at most 200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 2000, message = "prompt must be between 1 and 2000 characters"))]
    pub prompt: Option<String>,
    pub language: Option<Language>,
}

/// Multipart form accepted by the image endpoint (documentation only).
#[derive(ToSchema)]
pub struct IdentifyByImageForm {
    /// Packaging photo, any `image/*` type, at most 10 MB.
    #[schema(value_type = String, format = Binary)]
    pub image: String,
    pub prompt: Option<String>,
    pub language: Option<Language>,
}
