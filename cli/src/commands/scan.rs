use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use osprobe_common::config::{Config, ScanConfig};
use osprobe_common::network::range::RangeExpression;
use osprobe_common::output;
use osprobe_common::scan::report::AggregateReport;
use osprobe_common::{error, info, success, warn};
use osprobe_core::scanner::{self, ScanCoordinator};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span};

use crate::terminal::{colors, format, print, progress};

pub async fn scan(range: &str, scan_cfg: &ScanConfig, cfg: &Config) -> anyhow::Result<()> {
    let expression: RangeExpression = range
        .parse()
        .with_context(|| format!("Error parsing IP range '{range}'"))?;
    let targets: Vec<Ipv4Addr> = expression
        .expand()
        .with_context(|| format!("Error parsing IP range '{range}'"))?;

    print_settings(range, scan_cfg, cfg);

    let coordinator = ScanCoordinator::from_config(scan_cfg)?;
    let cancel = CancellationToken::new();
    let interrupt = spawn_interrupt_handler(cancel.clone());
    let deadline = scan_cfg
        .scan_deadline
        .map(|limit| scanner::cancel_after(cancel.clone(), limit));

    info!("Scanning {} IP addresses...", targets.len());

    let span = info_span!("scan", indicatif.pb_show = true);
    progress::attach_scan_bar(&span, targets.len())?;

    let start_time: Instant = Instant::now();
    let mut report: AggregateReport = coordinator
        .run(targets, cancel.clone(), |outcome| {
            progress::host_done(&span);
            if cfg.quiet < 2 {
                print::print(&format::outcome_line(outcome));
            }
        })
        .instrument(span.clone())
        .await;
    let total_time: Duration = start_time.elapsed();

    drop(span);
    interrupt.abort();
    if let Some(timer) = deadline {
        timer.abort();
    }

    if scan_cfg.sort_by_address {
        report.sort_by_address();
    }

    let written = output::write_results(&report, &scan_cfg.output_path);
    print_summary(&report, total_time, scan_cfg, written.is_ok(), cfg);

    written.with_context(|| "Error saving results")?;
    Ok(())
}

fn spawn_interrupt_handler(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling remaining hosts");
            cancel.cancel();
        }
    })
}

fn print_settings(range: &str, scan_cfg: &ScanConfig, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    let creds = &scan_cfg.credentials;
    let deadline: String = scan_cfg
        .scan_deadline
        .map(|d| format!("{}s", d.as_secs()))
        .unwrap_or_else(|| "none".to_string());

    print::header("scan settings", cfg.quiet);
    print::set_key_width(["Range", "Login", "Auth", "Timeouts", "Concurrency", "Deadline", "Output"]);
    print::aligned_line("Range", range.color(colors::IPV4_ADDR));
    print::aligned_line("Login", format!("{}@*:{}", creds.username, creds.port));
    print::aligned_line("Auth", creds.secret.method());
    print::aligned_line(
        "Timeouts",
        format!(
            "session {}s, reachability {}s",
            creds.connect_timeout.as_secs(),
            scan_cfg.reachability_timeout.as_secs()
        ),
    );
    print::aligned_line("Concurrency", scan_cfg.max_concurrency.to_string());
    print::aligned_line("Deadline", deadline);
    print::aligned_line("Output", scan_cfg.output_path.display().to_string());
    warn!("Host keys are not verified, only scan networks you trust");
}

fn print_summary(
    report: &AggregateReport,
    total_time: Duration,
    scan_cfg: &ScanConfig,
    saved: bool,
    cfg: &Config,
) {
    let successful: ColoredString = report.success_count().to_string().bold().green();
    let failed: ColoredString = report.failure_count().to_string().bold().red();
    let path: String = scan_cfg.output_path.display().to_string();

    print::header("scan completed", cfg.quiet);
    if cfg.quiet == 0 {
        print::set_key_width(["Successful", "Failed", "Total", "Elapsed"]);
        print::aligned_line("Successful", successful.clone());
        print::aligned_line("Failed", failed);
        print::aligned_line("Total", report.len().to_string());
        print::aligned_line("Elapsed", format::elapsed(total_time));
    } else {
        info!(
            "Successful: {}, failed: {}, total: {}",
            report.success_count(),
            report.failure_count(),
            report.len()
        );
    }

    if saved {
        success!("Results saved to: {path}");
    } else {
        error!("Results could not be saved to: {path}");
    }

    if cfg.quiet == 0 {
        let banner: String = format!(
            "Scan Complete: {successful} identified in {}",
            format::elapsed(total_time)
        );
        print::fat_separator();
        print::centerln(&banner);
    }
}
