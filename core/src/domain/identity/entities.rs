use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// What the browser hands over after the Google sign-in popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInCredential {
    GoogleIdToken(String),
    /// The popup flow failed client side with a provider error code.
    ProviderFailure { code: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Sign-in popup was closed before completing")]
    PopupClosed,

    #[error("Sign-in popup was blocked by the browser")]
    PopupBlocked,

    #[error("Identity provider is not configured")]
    NotConfigured,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    pub fn from_provider_code(code: &str, message: impl Into<String>) -> Self {
        match code {
            "auth/popup-closed-by-user" | "auth/cancelled-popup-request" => Self::PopupClosed,
            "auth/popup-blocked" => Self::PopupBlocked,
            _ => Self::Provider(message.into()),
        }
    }

    /// Translation key of the user-facing message.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::PopupClosed => "auth.error.popupClosed",
            Self::PopupBlocked => "auth.error.popupBlocked",
            Self::NotConfigured => "auth.error.notConfigured",
            Self::Provider(_) => "auth.error.unexpected",
        }
    }
}
