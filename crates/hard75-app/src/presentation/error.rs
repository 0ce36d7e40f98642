use hard75_domain::shared::{DomainError, ErrorCode, ErrorSeverity};
use serde::{Deserialize, Serialize};

/// Structured error for CLI output
///
/// Printed as JSON in `--json` mode, as `[code] message` otherwise:
/// - Error code for programmatic handling
/// - Human-readable message
/// - Severity level
/// - Recoverability flag for retry logic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    /// Numeric error code (1xxx-6xxx range)
    pub code: u16,

    pub message: String,

    pub severity: ErrorSeverity,

    /// Whether the operation can be retried
    pub recoverable: bool,
}

impl CommandError {
    pub fn from_code(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: error_code.code(),
            message: message.into(),
            severity: error_code.severity(),
            recoverable: error_code.is_recoverable(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InfrastructureError, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InvalidInput, message)
    }
}

impl From<DomainError> for CommandError {
    fn from(err: DomainError) -> Self {
        Self {
            code: err.code().code(),
            message: err.message().to_string(),
            severity: err.severity(),
            recoverable: err.is_recoverable(),
        }
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(err) => Self::infrastructure(format!("{:#}", err)),
        }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        Self::infrastructure(err.to_string())
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_from_domain_error() {
        let cmd_err: CommandError = DomainError::Storage("disk full".to_string()).into();

        assert_eq!(cmd_err.code, 4001);
        assert_eq!(cmd_err.message, "disk full");
        assert_eq!(cmd_err.severity, ErrorSeverity::Error);
        assert!(!cmd_err.recoverable);
    }

    #[test]
    fn test_command_error_from_anyhow_keeps_domain_code() {
        let err = anyhow::Error::new(DomainError::Remote("unreachable".to_string()));
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, 5004);
        assert!(cmd_err.recoverable);

        let cmd_err: CommandError = anyhow::anyhow!("boom").into();
        assert_eq!(cmd_err.code, 5001);
        assert_eq!(cmd_err.to_string(), "[5001] boom");
    }

    #[test]
    fn test_invalid_input_helper() {
        let err = CommandError::invalid_input("unknown habit");
        assert_eq!(err.code, 6002);
        assert_eq!(err.severity, ErrorSeverity::Info);
    }
}
