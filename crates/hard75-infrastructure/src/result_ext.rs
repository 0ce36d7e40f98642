use hard75_domain::shared::DomainError;

/// Extension trait for Result types to simplify error handling
pub trait ResultExt<T, E> {
    /// Convert error to DomainError::Infrastructure
    fn to_infra_err(self) -> Result<T, DomainError>;

    /// Convert error to DomainError::Storage
    fn to_storage_err(self, context: &str) -> Result<T, DomainError>;

    /// Convert error to DomainError::Remote
    fn to_remote_err(self, context: &str) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn to_infra_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(e.to_string()))
    }

    fn to_storage_err(self, context: &str) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Storage(format!("{}: {}", context, e)))
    }

    fn to_remote_err(self, context: &str) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Remote(format!("{}: {}", context, e)))
    }
}
