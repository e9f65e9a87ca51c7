pub mod classification;
pub(crate) mod constructors;
pub mod types;

pub(crate) use constructors::*;
pub use types::{Error, Result};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
