pub mod services;
pub mod value_objects;

pub use services::Translator;
pub use value_objects::Language;
