pub mod chat;
pub mod common;
pub mod identity;
pub mod localization;
pub mod medication;
pub mod preferences;
