pub mod classifier;
pub mod clock;
pub mod command;
pub mod config;
pub mod desk;
pub mod error;
pub mod followup;
pub mod ident;
pub mod identity;
pub mod incident;
pub mod platform;
pub mod render;
pub mod timeline;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{ParseError, PlatformError, Result, ShiftError};
