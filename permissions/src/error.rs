//! Error types for permission queries.

use thiserror::Error;

/// Result type alias for permission queries.
pub type Result<T> = std::result::Result<T, PermissionError>;

/// Why the declared permissions could not be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The host could not read the application's manifest.
    #[error("Package not found")]
    PackageNotFound,
}
