use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod clock;

pub use clock::{Clock, SystemClock};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(UserId);
define_id!(SubscriptionId);

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication (1xxx)
    AuthenticationFailed = 1001,
    SignInCancelled = 1002,

    // Data & Persistence (4xxx)
    StorageError = 4001,
    DataIntegrityError = 4003,
    SerializationError = 4004,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,
    NetworkError = 5002,
    TimeoutError = 5003,
    RemoteServiceError = 5004,
    ConfigMissing = 5005,

    // Validation (6xxx)
    ValidationError = 6001,
    InvalidInput = 6002,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorCode::AuthenticationFailed
            | ErrorCode::NetworkError
            | ErrorCode::RemoteServiceError
            | ErrorCode::ConfigMissing => ErrorSeverity::Warning,

            ErrorCode::SignInCancelled
            | ErrorCode::ValidationError
            | ErrorCode::InvalidInput => ErrorSeverity::Info,

            ErrorCode::StorageError
            | ErrorCode::DataIntegrityError
            | ErrorCode::InfrastructureError => ErrorSeverity::Error,

            _ => ErrorSeverity::Warning,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::NetworkError
                | ErrorCode::TimeoutError
                | ErrorCode::RemoteServiceError
                | ErrorCode::SignInCancelled
        )
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Authentication(_) => ErrorCode::AuthenticationFailed,
            DomainError::Storage(_) => ErrorCode::StorageError,
            DomainError::Remote(_) => ErrorCode::RemoteServiceError,
            DomainError::Config(_) => ErrorCode::ConfigMissing,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::DataIntegrity(_) => ErrorCode::DataIntegrityError,
            DomainError::InvalidInput(_) => ErrorCode::InvalidInput,
            DomainError::Serialization(_) => ErrorCode::SerializationError,
            DomainError::Timeout(_) => ErrorCode::TimeoutError,
        }
    }

    /// Get error message
    pub fn message(&self) -> &str {
        match self {
            DomainError::Authentication(msg)
            | DomainError::Storage(msg)
            | DomainError::Remote(msg)
            | DomainError::Config(msg)
            | DomainError::Infrastructure(msg)
            | DomainError::Validation(msg)
            | DomainError::DataIntegrity(msg)
            | DomainError::InvalidInput(msg)
            | DomainError::Serialization(msg)
            | DomainError::Timeout(msg) => msg,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_severity() {
        let err = DomainError::Remote("unreachable".to_string());
        assert_eq!(err.code().code(), 5004);
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(err.is_recoverable());

        let err = DomainError::Storage("quota exceeded".to_string());
        assert_eq!(err.code(), ErrorCode::StorageError);
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_format_with_code() {
        let err = DomainError::Validation("Workout 1 is not completed.".to_string());
        assert_eq!(
            err.format_with_code(),
            "[6001] Validation error: Workout 1 is not completed."
        );
        assert_eq!(err.message(), "Workout 1 is not completed.");
    }

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::from_string("uid-123");
        assert_eq!(id.as_str(), "uid-123");
        assert_eq!(id.to_string(), "uid-123");
        assert_ne!(UserId::new(), UserId::new());
    }
}
