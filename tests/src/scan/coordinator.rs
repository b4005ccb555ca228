use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use osprobe_common::network::range;
use osprobe_common::scan::outcome::UNREACHABLE_REASON;
use osprobe_core::scanner::ScanCoordinator;
use tokio_util::sync::CancellationToken;

use crate::support::{FakeNetwork, HostBehavior, fallback_only_host, linux_host, locked_host};

fn mixed_network(delay: Duration) -> FakeNetwork {
    FakeNetwork::new(delay)
        .with_host(Ipv4Addr::new(10, 9, 0, 2), linux_host("ID=debian"))
        .with_host(Ipv4Addr::new(10, 9, 0, 5), fallback_only_host("ID=alpine"))
        .with_host(Ipv4Addr::new(10, 9, 0, 7), HostBehavior::Offline)
        .with_host(Ipv4Addr::new(10, 9, 1, 3), locked_host())
        .with_host(Ipv4Addr::new(10, 9, 1, 8), linux_host("ID=rhel"))
}

#[tokio::test]
async fn expanded_range_is_fully_accounted_for() {
    let targets = range::expand("10.9.0-1.1-8").unwrap();
    assert_eq!(targets.len(), 16);

    let net = Arc::new(mixed_network(Duration::from_millis(5)));
    let scan = ScanCoordinator::new(net.clone(), net.clone(), 4);

    let report = scan.run(targets, CancellationToken::new(), |_| {}).await;

    assert_eq!(report.len(), 16);
    assert_eq!(report.success_count(), 3);
    assert_eq!(report.failure_count(), 13);
    assert_eq!(report.success_count() + report.failure_count(), 16);
}

#[tokio::test]
async fn outcomes_carry_payloads_and_reasons() {
    let targets = range::expand("10.9.0-1.1-8").unwrap();
    let net = Arc::new(mixed_network(Duration::ZERO));
    let scan = ScanCoordinator::new(net.clone(), net.clone(), 10);

    let report = scan.run(targets, CancellationToken::new(), |_| {}).await;

    let payload = |addr: Ipv4Addr| report.get(addr).and_then(|o| o.payload());
    let reason = |addr: Ipv4Addr| report.get(addr).and_then(|o| o.failure_reason());

    assert_eq!(payload(Ipv4Addr::new(10, 9, 0, 2)), Some("ID=debian"));
    assert_eq!(payload(Ipv4Addr::new(10, 9, 0, 5)), Some("ID=alpine"));
    assert_eq!(
        reason(Ipv4Addr::new(10, 9, 1, 3)),
        Some("failed to dial: ssh: unable to authenticate")
    );
    assert_eq!(reason(Ipv4Addr::new(10, 9, 0, 1)), Some(UNREACHABLE_REASON));
}

#[tokio::test]
async fn offline_hosts_are_never_dialed() {
    let targets = range::expand("10.9.0-1.1-8").unwrap();
    let net = Arc::new(mixed_network(Duration::ZERO));
    let scan = ScanCoordinator::new(net.clone(), net.clone(), 3);

    let report = scan.run(targets, CancellationToken::new(), |_| {}).await;
    let offline = report.get(Ipv4Addr::new(10, 9, 0, 7));
    assert_eq!(offline.and_then(|o| o.failure_reason()), Some(UNREACHABLE_REASON));

    let expected = [
        Ipv4Addr::new(10, 9, 0, 2),
        Ipv4Addr::new(10, 9, 0, 5),
        Ipv4Addr::new(10, 9, 1, 3),
        Ipv4Addr::new(10, 9, 1, 8),
    ];
    assert_eq!(net.session_targets(), expected.into_iter().collect());
    // debian and rhel answer first try, alpine and the locked host need two
    assert_eq!(net.session_count(), 6);
}

#[tokio::test]
async fn slow_sessions_never_exceed_the_cap() {
    let targets = range::expand("10.20.0.1-24").unwrap();
    let mut net = FakeNetwork::new(Duration::from_millis(25));
    for addr in &targets {
        net = net.with_host(*addr, linux_host("ID=arch"));
    }
    let net = Arc::new(net);
    let scan = ScanCoordinator::new(net.clone(), net.clone(), 5);

    let report = scan.run(targets, CancellationToken::new(), |_| {}).await;

    assert_eq!(report.success_count(), 24);
    assert!(net.peak_sessions() <= 5, "peak {}", net.peak_sessions());
}

#[tokio::test]
async fn observer_sees_every_outcome_as_it_arrives() {
    let targets = range::expand("10.9.0.1-8").unwrap();
    let net = Arc::new(mixed_network(Duration::ZERO));
    let scan = ScanCoordinator::new(net.clone(), net.clone(), 2);

    let mut observed: Vec<Ipv4Addr> = Vec::new();
    let report = scan
        .run(targets, CancellationToken::new(), |outcome| observed.push(outcome.address))
        .await;

    let recorded: Vec<Ipv4Addr> = report.outcomes().iter().map(|o| o.address).collect();
    assert_eq!(observed, recorded);
}
