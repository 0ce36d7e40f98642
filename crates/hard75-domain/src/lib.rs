// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod day_record;
pub mod identity;
pub mod namespace;
pub mod remote_log;
pub mod shared;
pub mod storage;
pub mod streak;
pub mod validation;

// Re-exports for convenience
pub use shared::{DomainError, UserId};
