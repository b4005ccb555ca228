pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use osprobe_common::config::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_OUTPUT_FILE, DEFAULT_PASSWORD, DEFAULT_PORT, DEFAULT_RANGE,
    DEFAULT_REACHABILITY_TIMEOUT, DEFAULT_SESSION_TIMEOUT, DEFAULT_USERNAME, ScanConfig, Secret,
    SessionCredentials,
};

#[derive(Parser)]
#[command(name = "scan_os", version)]
#[command(about = "Identify the operating systems of an IPv4 range over SSH.")]
pub struct CommandLine {
    /// Range to scan, each part a value or an inclusive span (e.g. 10.0.1-2.5-10)
    #[arg(default_value = DEFAULT_RANGE)]
    pub range: String,

    /// Login user for every host
    #[arg(short, long, env = "SCAN_OS_USER", default_value = DEFAULT_USERNAME)]
    pub user: String,

    /// Login password, ignored when --key is given
    #[arg(short, long, env = "SCAN_OS_PASSWORD", default_value = DEFAULT_PASSWORD, hide_env_values = true, hide_default_value = true)]
    pub password: String,

    /// Private key file used instead of the password
    #[arg(short, long, env = "SCAN_OS_KEY")]
    pub key: Option<PathBuf>,

    /// Passphrase protecting --key
    #[arg(long, env = "SCAN_OS_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// SSH port, also used by the reachability check
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds allowed for each of dial, session open and command
    #[arg(short, long, default_value_t = DEFAULT_SESSION_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Seconds allowed for the reachability check
    #[arg(long, default_value_t = DEFAULT_REACHABILITY_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub reach_timeout: u64,

    /// Hosts probed at the same time
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENCY as u64, value_parser = clap::value_parser!(u64).range(1..=4096))]
    pub concurrency: u64,

    /// Result file, created or truncated
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Stop the whole scan after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub deadline: Option<u64>,

    /// Write results ordered by address instead of completion order
    #[arg(long)]
    pub sorted: bool,

    /// Less output (-q hides headers, -qq also hides per-host lines)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_config(&self) -> anyhow::Result<ScanConfig> {
        let secret = match &self.key {
            Some(path) => Secret::KeyFile {
                path: path.clone(),
                passphrase: self.passphrase.clone(),
            },
            None => Secret::Password(self.password.clone()),
        };

        let cfg = ScanConfig {
            credentials: SessionCredentials {
                username: self.user.clone(),
                secret,
                port: self.port,
                connect_timeout: Duration::from_secs(self.timeout),
            },
            reachability_timeout: Duration::from_secs(self.reach_timeout),
            max_concurrency: usize::try_from(self.concurrency)?,
            output_path: self.output.clone(),
            scan_deadline: self.deadline.map(Duration::from_secs),
            sort_by_address: self.sorted,
        };

        cfg.validate()?;
        Ok(cfg)
    }
}
