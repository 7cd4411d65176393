use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::domain::identity::{
    entities::{AuthError, AuthenticatedUser, SignInCredential},
    ports::IdentityProvider,
};

/// Current-user state of one client, published on a watch channel.
pub struct IdentitySession<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    state: Arc<watch::Sender<Option<AuthenticatedUser>>>,
}

impl<P> Clone for IdentitySession<P>
where
    P: IdentityProvider,
{
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            state: self.state.clone(),
        }
    }
}

impl<P> IdentitySession<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        let (state, _) = watch::channel(None);

        Self {
            provider,
            state: Arc::new(state),
        }
    }

    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.state.borrow().clone()
    }

    /// Every subscriber sees the current user, then each later change.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthenticatedUser>> {
        self.state.subscribe()
    }

    #[instrument(skip(self, credential))]
    pub async fn sign_in(
        &self,
        credential: SignInCredential,
    ) -> Result<AuthenticatedUser, AuthError> {
        let id_token = match credential {
            SignInCredential::GoogleIdToken(id_token) => id_token,
            SignInCredential::ProviderFailure { code, message } => {
                warn!(code = %code, "Client reported a sign-in failure");
                return Err(AuthError::from_provider_code(&code, message));
            }
        };

        let user = self.provider.sign_in_with_google(id_token).await?;
        info!(uid = %user.uid, "User signed in");

        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.state.send_replace(None) {
            info!(uid = %user.uid, "User signed out");
        }
    }
}
