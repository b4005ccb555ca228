use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use osprobe_common::network::range;
use osprobe_common::output;
use osprobe_core::scanner::ScanCoordinator;
use tokio_util::sync::CancellationToken;

use crate::support::{FakeNetwork, linux_host};

#[tokio::test]
async fn scan_results_round_trip_through_the_file() -> anyhow::Result<()> {
    let targets = range::expand("172.16.4.1-6")?;
    let net = Arc::new(
        FakeNetwork::new(Duration::from_millis(2))
            .with_host(
                Ipv4Addr::new(172, 16, 4, 2),
                linux_host("NAME=\"Ubuntu\"\nVERSION_ID=\"24.04\"\nID=ubuntu"),
            )
            .with_host(Ipv4Addr::new(172, 16, 4, 5), linux_host("ID=opensuse-leap")),
    );
    let scan = ScanCoordinator::new(net.clone(), net.clone(), 3);
    let report = scan.run(targets, CancellationToken::new(), |_| {}).await;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("os-results.txt");
    output::write_results(&report, &path)?;

    let records = output::read_results(&path).context("reading back os-results.txt")?;
    let expected: Vec<(Ipv4Addr, String)> = report
        .outcomes()
        .iter()
        .map(|o| (o.address, o.text().to_string()))
        .collect();
    assert_eq!(records, expected);
    Ok(())
}

#[tokio::test]
async fn sorted_report_is_written_in_address_order() -> anyhow::Result<()> {
    let targets = range::expand("172.16.4.1-6")?;
    let net = Arc::new(FakeNetwork::new(Duration::ZERO));
    let scan = ScanCoordinator::new(net.clone(), net.clone(), 6);

    let mut report = scan.run(targets.clone(), CancellationToken::new(), |_| {}).await;
    report.sort_by_address();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sorted.txt");
    output::write_results(&report, &path)?;

    let text = std::fs::read_to_string(&path).context("reading sorted.txt")?;
    let expected: String = targets
        .iter()
        .map(|addr| format!("{{{addr}:Host unreachable}}\n"))
        .collect();
    assert_eq!(text, expected);
    Ok(())
}
