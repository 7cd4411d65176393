pub mod identity;
pub mod llm;
pub mod localization;
pub mod preferences;
