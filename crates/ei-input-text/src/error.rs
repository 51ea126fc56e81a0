//! Error type for long text input operations

use ei_core::EntityIdError;
use ei_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the enhanced_input component.
///
/// None of these are fatal: command handlers degrade every variant to a
/// logged warning or error and keep serving subsequent commands.
#[derive(Debug, Error)]
pub enum InputTextError {
    #[error("missing required field '{0}'")]
    InvalidArgument(&'static str),

    #[error("no enhanced_input entity or stored record named '{0}'")]
    NotFound(String),

    #[error("enhanced_input has no active managing context")]
    NotLoaded,

    #[error("invalid entity name: {0}")]
    InvalidName(#[from] EntityIdError),

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}
