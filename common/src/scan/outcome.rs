use std::net::Ipv4Addr;

/// Failure reason recorded when the reachability check fails.
pub const UNREACHABLE_REASON: &str = "Host unreachable";

/// Failure reason recorded for targets stopped by cancellation or deadline.
pub const CANCELLED_REASON: &str = "scan cancelled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Trimmed OS identity text.
    Identified(String),
    /// Human-readable cause.
    Failed(String),
}

/// The single record produced for one target address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub address: Ipv4Addr,
    pub status: ProbeStatus,
}

impl ProbeOutcome {
    pub fn identified(address: Ipv4Addr, fingerprint: impl Into<String>) -> Self {
        Self {
            address,
            status: ProbeStatus::Identified(fingerprint.into()),
        }
    }

    pub fn failed(address: Ipv4Addr, reason: impl Into<String>) -> Self {
        Self {
            address,
            status: ProbeStatus::Failed(reason.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, ProbeStatus::Identified(_))
    }

    pub fn payload(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Identified(text) => Some(text),
            ProbeStatus::Failed(_) => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Identified(_) => None,
            ProbeStatus::Failed(reason) => Some(reason),
        }
    }

    /// Payload on success, reason on failure.
    pub fn text(&self) -> &str {
        match &self.status {
            ProbeStatus::Identified(text) | ProbeStatus::Failed(text) => text,
        }
    }
}
