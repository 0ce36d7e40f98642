mod firestore;
mod memory;
mod retry;

pub use firestore::FirestoreLogStore;
pub use memory::InMemoryRemoteLogStore;
pub use retry::RetryConfig;
