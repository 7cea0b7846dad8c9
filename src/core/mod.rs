pub mod config;
pub mod error;
pub mod types;

pub use config::{GateConfig, OverrideMap};
pub use error::{GateError, Result};
