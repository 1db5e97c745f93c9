pub mod detector;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod math;

pub use error::{Result, TomoError};
