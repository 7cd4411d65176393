pub mod identify_by_image;
pub mod identify_by_name;

pub use identify_by_image::{__path_identify_by_image, identify_by_image};
pub use identify_by_name::{__path_identify_by_name, identify_by_name};
