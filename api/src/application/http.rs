pub mod chat;
pub mod health;
pub mod identity;
pub mod localization;
pub mod medication;
pub mod preferences;
pub mod server;
