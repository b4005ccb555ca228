//! Run-wide settings.
//!
//! Built once at startup and handed down by reference. Nothing in here is
//! mutated after the scan starts.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_RANGE: &str = "192.168.33.1-245";
pub const DEFAULT_USERNAME: &str = "root";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REACHABILITY_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
pub const DEFAULT_OUTPUT_FILE: &str = "os-results.txt";

/// Terminal presentation settings.
pub struct Config {
    /// 0 prints everything, 1 hides headers and the settings block,
    /// 2 additionally hides the per-host lines.
    pub quiet: u8,
}

/// How a session proves its identity to the remote host.
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    Password(String),
    KeyFile {
        path: PathBuf,
        passphrase: Option<String>,
    },
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Secret::Password(_) => f.write_str("Password(<redacted>)"),
            Secret::KeyFile { path, .. } => f
                .debug_struct("KeyFile")
                .field("path", path)
                .field("passphrase", &"<redacted>")
                .finish(),
        }
    }
}

impl Secret {
    /// Short, secret-free label for the settings summary.
    pub fn method(&self) -> String {
        match self {
            Secret::Password(_) => "password".to_string(),
            Secret::KeyFile { path, .. } => format!("key {}", path.display()),
        }
    }
}

/// Login material shared read-only by every concurrent session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub username: String,
    pub secret: Secret,
    pub port: u16,
    /// Bounds each of dial, channel open and command execution.
    pub connect_timeout: Duration,
}

impl Default for SessionCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            secret: Secret::Password(DEFAULT_PASSWORD.to_string()),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub credentials: SessionCredentials,
    /// Bare TCP connect timeout used before a session is attempted.
    pub reachability_timeout: Duration,
    /// Admission cap: targets probed at the same time.
    pub max_concurrency: usize,
    pub output_path: PathBuf,
    /// Cancels whatever is still running once elapsed. `None` waits forever.
    pub scan_deadline: Option<Duration>,
    /// Reorder the report by address before it is written.
    pub sort_by_address: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            credentials: SessionCredentials::default(),
            reachability_timeout: DEFAULT_REACHABILITY_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            scan_deadline: None,
            sort_by_address: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.credentials.connect_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("session"));
        }
        if self.reachability_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("reachability"));
        }
        if self.scan_deadline.is_some_and(|d| d.is_zero()) {
            return Err(ConfigError::ZeroTimeout("scan deadline"));
        }
        if self.credentials.username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(())
    }
}
