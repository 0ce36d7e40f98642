pub mod environment;
pub mod remote_config;
pub mod timeouts;

pub use environment::Environment;
pub use remote_config::{ConfigSource, RemoteConfig, RemoteConfigLoader, CONFIG_NOT_FOUND};
pub use timeouts::TimeoutConfig;
