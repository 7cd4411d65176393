pub mod health_check;

pub use health_check::{__path_health_check, health_check};
