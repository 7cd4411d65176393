pub mod get_locale;

pub use get_locale::{__path_get_locale, get_locale};
