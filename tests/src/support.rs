use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use osprobe_common::error::ProbeError;
use osprobe_core::network::ssh::CommandRunner;
use osprobe_core::network::tcp::ReachabilityProbe;

/// What a fake host does when a session is opened against it.
#[derive(Clone)]
pub enum HostBehavior {
    /// Refuses the reachability check.
    Offline,
    /// Answers the given command results, keyed by command.
    Responds(HashMap<&'static str, Result<String, ProbeError>>),
}

/// In-memory network used as both reachability layer and command runner.
///
/// Counts session attempts per host and the peak number of sessions open
/// at once.
#[derive(Default)]
pub struct FakeNetwork {
    hosts: HashMap<Ipv4Addr, HostBehavior>,
    session_delay: Duration,
    open: AtomicUsize,
    peak: AtomicUsize,
    sessions: Mutex<Vec<Ipv4Addr>>,
}

impl FakeNetwork {
    pub fn new(session_delay: Duration) -> Self {
        Self {
            session_delay,
            ..Self::default()
        }
    }

    pub fn with_host(mut self, addr: Ipv4Addr, behavior: HostBehavior) -> Self {
        self.hosts.insert(addr, behavior);
        self
    }

    pub fn peak_sessions(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn session_targets(&self) -> HashSet<Ipv4Addr> {
        self.sessions.lock().unwrap().iter().copied().collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl ReachabilityProbe for FakeNetwork {
    async fn is_reachable(&self, addr: Ipv4Addr) -> bool {
        matches!(self.hosts.get(&addr), Some(HostBehavior::Responds(_)))
    }
}

#[async_trait]
impl CommandRunner for FakeNetwork {
    async fn run(&self, addr: Ipv4Addr, command: &str) -> Result<String, ProbeError> {
        self.sessions.lock().unwrap().push(addr);

        let now_open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now_open, Ordering::SeqCst);
        tokio::time::sleep(self.session_delay).await;
        self.open.fetch_sub(1, Ordering::SeqCst);

        match self.hosts.get(&addr) {
            Some(HostBehavior::Responds(answers)) => answers
                .get(command)
                .cloned()
                .unwrap_or_else(|| Err(ProbeError::Command("Process exited with status 1".into()))),
            _ => Err(ProbeError::Dial("connection refused".into())),
        }
    }
}

pub fn linux_host(release: &str) -> HostBehavior {
    HostBehavior::Responds(HashMap::from([(
        "cat /etc/os-release",
        Ok(format!("{release}\n")),
    )]))
}

pub fn fallback_only_host(release: &str) -> HostBehavior {
    HostBehavior::Responds(HashMap::from([(
        "cat /usr/lib/os-release",
        Ok(format!("  {release}\n")),
    )]))
}

pub fn locked_host() -> HostBehavior {
    HostBehavior::Responds(HashMap::from([
        (
            "cat /etc/os-release",
            Err(ProbeError::Dial("ssh: unable to authenticate".into())),
        ),
        (
            "cat /usr/lib/os-release",
            Err(ProbeError::Dial("ssh: unable to authenticate".into())),
        ),
    ]))
}
