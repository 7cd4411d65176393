pub mod get_preferences;
pub mod update_preferences;

pub use get_preferences::{__path_get_preferences, get_preferences};
pub use update_preferences::{__path_update_preferences, update_preferences};
