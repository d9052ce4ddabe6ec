//! Unified error handling for the IDG4400 platform layer
//!
//! Every accessor, register operation and control-loop step returns this
//! single error type. Each variant belongs to one of the four platform status
//! classes (`INVALID`, `UNSUPPORTED`, `INTERNAL`, `PARAM`) reported by [`PlatformError::kind`].

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias using PlatformError
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Platform status classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad entity identifier or rejected value
    Invalid,
    /// Capability not implemented for this entity
    Unsupported,
    /// I/O, parse or register failure
    Internal,
    /// Out-of-range input to an actuator
    Param,
}

impl ErrorKind {
    /// Negative status code as reported by the platform entry points
    pub fn status_code(self) -> i32 {
        match self {
            ErrorKind::Invalid => -3,
            ErrorKind::Unsupported => -10,
            ErrorKind::Internal => -20,
            ErrorKind::Param => -30,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Invalid => "INVALID",
            ErrorKind::Unsupported => "UNSUPPORTED",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::Param => "PARAM",
        };
        f.write_str(name)
    }
}

/// Unified error type for all platform operations
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to parse {path}: '{content}'")]
    Parse {
        path: PathBuf,
        content: String,
    },

    // ============================================================================
    // Register Access Errors
    // ============================================================================
    #[error("Failed to read register {base:#x}+{offset:#x}: {reason}")]
    RegisterRead {
        base: u32,
        offset: u32,
        reason: String,
    },

    #[error("Failed to write register {base:#x}+{offset:#x} <- {value:#x}: {reason}")]
    RegisterWrite {
        base: u32,
        offset: u32,
        value: u32,
        reason: String,
    },

    // ============================================================================
    // Entity and Capability Errors
    // ============================================================================
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Invalid fan percentage: {value}")]
    ZeroPercentage {
        value: u32,
    },

    #[error("Fan percentage {value} outside {min}..={max}")]
    PercentageOutOfRange {
        value: u32,
        min: u32,
        max: u32,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Generic
    // ============================================================================
    #[error("{0}")]
    Internal(String),
}

impl PlatformError {
    /// Status class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlatformError::InvalidEntity(_) | PlatformError::ZeroPercentage { .. } => ErrorKind::Invalid,
            PlatformError::Unsupported(_) => ErrorKind::Unsupported,
            PlatformError::PercentageOutOfRange { .. } => ErrorKind::Param,
            PlatformError::Io(_)
            | PlatformError::FileRead { .. }
            | PlatformError::FileWrite { .. }
            | PlatformError::Parse { .. }
            | PlatformError::RegisterRead { .. }
            | PlatformError::RegisterWrite { .. }
            | PlatformError::Config(_)
            | PlatformError::Json(_)
            | PlatformError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for `self.kind().status_code()`
    pub fn status_code(&self) -> i32 {
        self.kind().status_code()
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        PlatformError::Internal(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        PlatformError::Unsupported(msg.into())
    }

    pub fn invalid_entity(msg: impl Into<String>) -> Self {
        PlatformError::InvalidEntity(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        PlatformError::Config(msg.into())
    }

    pub fn register_read(base: u32, offset: u32, reason: impl Into<String>) -> Self {
        PlatformError::RegisterRead { base, offset, reason: reason.into() }
    }

    pub fn register_write(base: u32, offset: u32, value: u32, reason: impl Into<String>) -> Self {
        PlatformError::RegisterWrite { base, offset, value, reason: reason.into() }
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError::Internal(s)
    }
}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError::Internal(s.to_string())
    }
}
