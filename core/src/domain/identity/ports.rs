use std::future::Future;

use crate::domain::identity::entities::{AuthError, AuthenticatedUser};

#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges a Google ID token for the provider's user record.
    fn sign_in_with_google(
        &self,
        id_token: String,
    ) -> impl Future<Output = Result<AuthenticatedUser, AuthError>> + Send;
}
