use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use osprobe_common::scan::outcome::UNREACHABLE_REASON;
use osprobe_core::network::tcp::TcpReachability;
use osprobe_core::scanner::ScanCoordinator;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::support::{FakeNetwork, linux_host};

const LOCALHOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

#[tokio::test]
async fn listening_host_proceeds_to_fingerprint() {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let reach = Arc::new(TcpReachability::new(port, Duration::from_secs(1)));
    let net = Arc::new(FakeNetwork::new(Duration::ZERO).with_host(LOCALHOST, linux_host("ID=fedora")));
    let scan = ScanCoordinator::new(reach, net.clone(), 1);

    let report = scan.run(vec![LOCALHOST], CancellationToken::new(), |_| {}).await;

    assert_eq!(report.success_count(), 1);
    assert_eq!(report.outcomes()[0].payload(), Some("ID=fedora"));
    assert_eq!(net.session_count(), 1);
}

#[tokio::test]
async fn closed_port_stops_before_any_session() {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let reach = Arc::new(TcpReachability::new(port, Duration::from_secs(1)));
    let net = Arc::new(FakeNetwork::new(Duration::ZERO).with_host(LOCALHOST, linux_host("ID=fedora")));
    let scan = ScanCoordinator::new(reach, net.clone(), 1);

    let report = scan.run(vec![LOCALHOST], CancellationToken::new(), |_| {}).await;

    assert_eq!(report.outcomes()[0].failure_reason(), Some(UNREACHABLE_REASON));
    assert_eq!(net.session_count(), 0);
}
