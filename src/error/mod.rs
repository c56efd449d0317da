//! Error handling for the registry
//!
//! This module provides comprehensive error types for all registry operations.

use std::fmt;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Comprehensive error types for registry operations
#[derive(Debug, Clone)]
pub enum RegistryError {
    /// Caller is not the registry administrator
    NotAuthorized(String),
    /// No project registered under the given id
    ProjectNotFound(u64),
    /// No sensor reading recorded under the given id
    ReadingNotFound(u64),
    /// Project exists but has been deactivated
    ProjectInactive(u64),
    /// Amount failed validation (zero, or arithmetic overflow)
    InvalidAmount(String),
    /// Credit recipient is the null identity
    InvalidRecipient(String),
    /// Holder's available credits cannot cover the requested amount
    InsufficientAvailableCredits { required: u64, available: u64 },
    /// Attached payment does not cover the purchase cost
    InsufficientPayment { required: u128, provided: u128 },
    /// Database-related errors
    Database(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Configuration errors
    Config(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotAuthorized(caller) => {
                write!(f, "Only admin can perform this action (caller: {caller})")
            }
            RegistryError::ProjectNotFound(id) => write!(f, "Project not found: {id}"),
            RegistryError::ReadingNotFound(id) => write!(f, "Sensor reading not found: {id}"),
            RegistryError::ProjectInactive(id) => write!(f, "Project is not active: {id}"),
            RegistryError::InvalidAmount(msg) => write!(f, "Invalid amount: {msg}"),
            RegistryError::InvalidRecipient(addr) => {
                write!(f, "Invalid credit recipient: {addr:?}")
            }
            RegistryError::InsufficientAvailableCredits {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient available credits: required {required}, available {available}"
                )
            }
            RegistryError::InsufficientPayment { required, provided } => {
                write!(
                    f,
                    "Insufficient payment: required {required}, provided {provided}"
                )
            }
            RegistryError::Database(msg) => write!(f, "Database error: {msg}"),
            RegistryError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            RegistryError::Io(msg) => write!(f, "I/O error: {msg}"),
            RegistryError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Io(err.to_string())
    }
}

impl From<sled::Error> for RegistryError {
    fn from(err: sled::Error) -> Self {
        RegistryError::Database(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for RegistryError {
    fn from(err: bincode::error::EncodeError) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for RegistryError {
    fn from(err: bincode::error::DecodeError) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}
