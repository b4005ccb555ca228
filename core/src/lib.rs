//! Network side of `scan_os`: reachability checks, SSH command sessions,
//! OS fingerprinting and the bounded-concurrency scan coordinator.

pub mod fingerprint;
pub mod network;
pub mod scanner;
