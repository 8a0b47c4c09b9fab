//! Error types and handling for the sluice library

use thiserror::Error;

/// Result type alias for sluice operations
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Main error type for the sluice library
///
/// All variants are construction-time or environment failures. The queue
/// itself has no transient runtime errors: full, empty and end-of-service
/// are normal states reported through the operation results.
#[derive(Error, Debug)]
pub enum SluiceError {
    /// Invalid configuration parameter
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Memory allocation errors
    #[error("Memory allocation error: {message}")]
    Memory {
        /// Error message describing the memory issue
        message: String,
    },

    /// CPU affinity errors
    #[error("CPU affinity error: {0}")]
    CpuAffinity(#[from] nix::Error),

    /// System resource errors
    #[error("System resource error: {message}")]
    SystemResource {
        /// Error message describing the system resource issue
        message: String,
    },
}

impl SluiceError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new memory allocation error
    pub fn memory(message: impl Into<String>) -> Self {
        Self::Memory {
            message: message.into(),
        }
    }

    /// Create a new system resource error
    pub fn system_resource(message: impl Into<String>) -> Self {
        Self::SystemResource {
            message: message.into(),
        }
    }

    /// Check if this error is a construction-time contract violation
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Check if this error is related to system resources
    pub fn is_system_resource_error(&self) -> bool {
        matches!(self, Self::Memory { .. } | Self::SystemResource { .. } | Self::CpuAffinity(_))
    }
}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::SluiceError::config(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SluiceError::config("test message");
        assert!(matches!(err, SluiceError::InvalidConfig { .. }));
        assert!(err.is_config_error());
        assert!(!err.is_system_resource_error());
    }

    #[test]
    fn test_error_classification() {
        let memory_err = SluiceError::memory("mmap failed");
        assert!(memory_err.is_system_resource_error());
        assert!(!memory_err.is_config_error());
    }

    #[test]
    fn test_error_macro() {
        let err = config_error!("Invalid mask: {:#b}", 0b01001111);
        assert!(matches!(err, SluiceError::InvalidConfig { .. }));
    }
}
