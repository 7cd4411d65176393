use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::domain::{
    common::IdentityConfig,
    identity::{
        entities::{AuthError, AuthenticatedUser},
        ports::IdentityProvider,
    },
};

const GOOGLE_PROVIDER_ID: &str = "google.com";
const REQUEST_URI: &str = "http://localhost";

/// Google sign-in through the Firebase Auth REST API.
#[derive(Debug, Clone)]
pub struct FirebaseIdentityProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpRequest {
    post_body: String,
    request_uri: String,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorResponse {
    error: FirebaseError,
}

#[derive(Debug, Deserialize)]
struct FirebaseError {
    message: String,
}

impl FirebaseIdentityProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(
            config.firebase_api_key.clone(),
            config.firebase_base_url.clone(),
        )
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl IdentityProvider for FirebaseIdentityProvider {
    #[instrument(skip(self, id_token))]
    async fn sign_in_with_google(&self, id_token: String) -> Result<AuthenticatedUser, AuthError> {
        if !self.is_configured() {
            return Err(AuthError::NotConfigured);
        }

        let url = format!(
            "{}/v1/accounts:signInWithIdp?key={}",
            self.base_url, self.api_key
        );
        let request = SignInWithIdpRequest {
            post_body: format!(
                "id_token={}&providerId={}",
                urlencoding::encode(&id_token),
                GOOGLE_PROVIDER_ID
            ),
            request_uri: REQUEST_URI.to_string(),
            return_secure_token: true,
            return_idp_credential: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Firebase request failed: {}", e);
                AuthError::Provider(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<FirebaseErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status.to_string(),
            };
            error!("Firebase sign-in rejected: {} - {}", status, message);
            return Err(AuthError::Provider(message));
        }

        let body: SignInWithIdpResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Firebase response: {}", e);
            AuthError::Provider(e.to_string())
        })?;

        Ok(AuthenticatedUser {
            uid: body.local_id,
            email: body.email,
            display_name: body.display_name,
            photo_url: body.photo_url,
        })
    }
}
