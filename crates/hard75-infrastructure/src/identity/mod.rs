mod file_session;

pub use file_session::{FileSessionIdentityProvider, SimulatedFailure, SESSION_FILE};
