use std::path::PathBuf;

use thiserror::Error;

/// Rejections raised while turning a range expression into addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid IP range format: expected 4 dot-separated parts, found {found}")]
    PartCount { found: usize },

    #[error("invalid range in part {part}: {text}")]
    MalformedRange { part: usize, text: String },

    #[error("invalid start value in part {part}: {text}")]
    InvalidStart { part: usize, text: String },

    #[error("invalid end value in part {part}: {text}")]
    InvalidEnd { part: usize, text: String },

    #[error("invalid value in part {part}: {text}")]
    InvalidValue { part: usize, text: String },

    #[error("start cannot be greater than end in part {part} ({start} > {end})")]
    InvertedRange { part: usize, start: u32, end: u32 },

    #[error("invalid IP address: {}", dotted(.0))]
    OctetOutOfRange([u32; 4]),

    #[error("no valid IP addresses generated")]
    EmptyResult,
}

/// Why a remote command could not produce output.
///
/// The rendered messages end up verbatim in the result file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// TCP connect, SSH handshake or authentication failed.
    #[error("failed to dial: {0}")]
    Dial(String),

    /// The connection is up but no session channel could be opened.
    #[error("failed to create session: {0}")]
    Session(String),

    /// The command could not run, exited non-zero, or its output was cut off.
    #[error("failed to execute command: {0}")]
    Command(String),
}

fn dotted(octets: &[u32; 4]) -> String {
    let [a, b, c, d] = octets;
    format!("{a}.{b}.{c}.{d}")
}

/// Failures reading or writing the result file.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write results to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read results from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed result record at line {line}: {text}")]
    Malformed { line: usize, text: String },
}

/// Settings rejected before a scan starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("username cannot be empty")]
    EmptyUsername,
}
