//! OS identification through well-known release files.
//!
//! The primary file is tried first; on any failure the fallback file is
//! tried exactly once. When both fail, only the fallback's error is kept,
//! which is what existing result-file consumers expect.

use std::net::Ipv4Addr;

use osprobe_common::debug;
use osprobe_common::error::ProbeError;
use osprobe_common::scan::outcome::ProbeOutcome;

use crate::network::ssh::CommandRunner;

pub const PRIMARY_COMMAND: &str = "cat /etc/os-release";
pub const FALLBACK_COMMAND: &str = "cat /usr/lib/os-release";

/// Returns the trimmed release text of `addr`.
pub async fn identify(runner: &dyn CommandRunner, addr: Ipv4Addr) -> Result<String, ProbeError> {
    let output = match runner.run(addr, PRIMARY_COMMAND).await {
        Ok(output) => output,
        Err(primary_err) => {
            debug!("{addr}: primary fingerprint failed ({primary_err}), trying fallback");
            runner.run(addr, FALLBACK_COMMAND).await?
        }
    };

    Ok(output.trim().to_string())
}

pub async fn probe(runner: &dyn CommandRunner, addr: Ipv4Addr) -> ProbeOutcome {
    match identify(runner, addr).await {
        Ok(fingerprint) => ProbeOutcome::identified(addr, fingerprint),
        Err(e) => ProbeOutcome::failed(addr, e.to_string()),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
