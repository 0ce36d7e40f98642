use std::time::Duration;

use hard75_domain::remote_log::REMOTE_LOG_LIMIT;

/// Timer and request budgets for the tracker
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Day rollover check interval (default: 30 seconds)
    pub rollover_check: Duration,

    /// Remote log poll interval for the REST feed (default: 15 seconds)
    pub remote_poll: Duration,

    /// HTTP request timeout (default: 10 seconds)
    pub http_request: Duration,

    /// Upper bound on awaiting a remote mirror write (default: 10 seconds)
    pub remote_write: Duration,

    /// Records fetched per remote query (default: 100)
    pub remote_log_limit: usize,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            rollover_check: Duration::from_secs(30),
            remote_poll: Duration::from_secs(15),
            http_request: Duration::from_secs(10),
            remote_write: Duration::from_secs(10),
            remote_log_limit: REMOTE_LOG_LIMIT,
        }
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set rollover check interval
    pub fn with_rollover_check(mut self, duration: Duration) -> Self {
        self.rollover_check = duration;
        self
    }

    /// Builder pattern: set remote poll interval
    pub fn with_remote_poll(mut self, duration: Duration) -> Self {
        self.remote_poll = duration;
        self
    }

    /// Builder pattern: set HTTP request timeout
    pub fn with_http_request(mut self, duration: Duration) -> Self {
        self.http_request = duration;
        self
    }

    /// Builder pattern: set remote write timeout
    pub fn with_remote_write(mut self, duration: Duration) -> Self {
        self.remote_write = duration;
        self
    }

    /// Builder pattern: set remote log limit, capped at the store maximum
    pub fn with_remote_log_limit(mut self, limit: usize) -> Self {
        self.remote_log_limit = limit.clamp(1, REMOTE_LOG_LIMIT);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TimeoutConfig::default();
        assert_eq!(config.rollover_check, Duration::from_secs(30));
        assert_eq!(config.remote_poll, Duration::from_secs(15));
        assert_eq!(config.http_request, Duration::from_secs(10));
        assert_eq!(config.remote_log_limit, 100);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TimeoutConfig::new()
            .with_rollover_check(Duration::from_millis(50))
            .with_remote_poll(Duration::from_secs(2))
            .with_remote_log_limit(500);

        assert_eq!(config.rollover_check, Duration::from_millis(50));
        assert_eq!(config.remote_poll, Duration::from_secs(2));
        assert_eq!(config.remote_log_limit, 100);
    }
}
