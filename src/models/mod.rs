pub mod common;
pub mod credits;
pub mod image;
pub mod user;

pub use common::*;
pub use credits::*;
pub use image::*;
pub use user::*;
