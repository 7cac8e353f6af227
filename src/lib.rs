pub mod error;
pub mod logger;
pub mod seq;
pub mod sim;

pub use error::{Error, Result};
