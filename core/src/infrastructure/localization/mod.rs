pub mod file_loader;

pub use file_loader::load_translations;
