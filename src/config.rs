//! Configuration for the check engine

use crate::errors::{CheckerError, Result};
use std::time::Duration;

/// User agent sent with every probe. Some sites answer unknown agents with 403.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/41.0.2228.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Overall timeout for a single probe request
    pub timeout: Duration,

    /// Additional attempts made for a URL after an unavailable outcome
    pub max_retries: u32,

    /// Suppress site lines for available sites
    pub quiet: bool,

    /// Upper bound on probes in flight across the whole run
    pub max_concurrent_probes: usize,

    /// User agent header sent with every probe
    pub user_agent: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 0,
            quiet: false,
            max_concurrent_probes: 32,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CheckConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_max_concurrent_probes(mut self, limit: usize) -> Self {
        self.max_concurrent_probes = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(CheckerError::Config("timeout must be greater than 0".to_string()));
        }

        if self.max_concurrent_probes == 0 {
            return Err(CheckerError::Config(
                "max_concurrent_probes must be greater than 0".to_string(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(CheckerError::Config("user_agent cannot be empty".to_string()));
        }

        Ok(())
    }
}
