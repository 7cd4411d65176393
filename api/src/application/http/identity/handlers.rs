pub mod current_user;
pub mod sign_in;
pub mod sign_out;

pub use current_user::{__path_current_user, current_user};
pub use sign_in::{__path_sign_in, sign_in};
pub use sign_out::{__path_sign_out, sign_out};
