use thiserror::Error;

use crate::core::types::{CategoryKey, EntityId};

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Category already registered: {0}")]
    DuplicateCategory(CategoryKey),

    #[error("Invalid override '{label}': {reason}")]
    InvalidOverride { label: String, reason: String },

    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GateError>;
