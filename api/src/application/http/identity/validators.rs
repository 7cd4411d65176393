use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Sign-in failure reported by the browser's popup flow.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct SignInFailureRequest {
    #[validate(length(min = 1, max = 200, message = "code must be between 1 and 200 characters"))]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
