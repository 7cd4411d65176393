pub mod entities;
pub mod ports;
pub mod services;

pub use entities::{AuthError, AuthenticatedUser, SignInCredential};
pub use ports::IdentityProvider;
pub use services::IdentitySession;
