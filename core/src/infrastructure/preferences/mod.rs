pub mod backend;
pub mod json_file_store;

pub use backend::PreferenceBackend;
pub use json_file_store::{InMemoryPreferenceStore, JsonFilePreferenceStore};
