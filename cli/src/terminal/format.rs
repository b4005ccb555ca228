use std::time::Duration;

use crate::terminal::colors;
use colored::*;
use osprobe_common::scan::outcome::{ProbeOutcome, ProbeStatus};

const PREVIEW_WIDTH: usize = 40;
const PRETTY_NAME_KEY: &str = "PRETTY_NAME=";

/// One console line per finished target.
pub fn outcome_line(outcome: &ProbeOutcome) -> String {
    let addr: ColoredString = outcome.address.to_string().color(colors::IPV4_ADDR);
    match &outcome.status {
        ProbeStatus::Identified(fingerprint) => format!(
            "{} Successfully retrieved OS info from {} {}",
            "✓".color(colors::SUCCESS).bold(),
            addr,
            format!("({})", preview(fingerprint)).color(colors::SEPARATOR)
        ),
        ProbeStatus::Failed(reason) => format!(
            "{} Failed to get OS info from {}: {}",
            "✗".color(colors::FAILURE).bold(),
            addr,
            reason
        ),
    }
}

/// Short human label for a fingerprint, display only.
///
/// Prefers the `PRETTY_NAME` line and falls back to the first line.
pub fn preview(fingerprint: &str) -> String {
    let label = fingerprint
        .lines()
        .find_map(|line| line.strip_prefix(PRETTY_NAME_KEY))
        .map(|value| value.trim_matches('"'))
        .or_else(|| fingerprint.lines().next())
        .unwrap_or_default();

    console::truncate_str(label, PREVIEW_WIDTH, "…").into_owned()
}

pub fn elapsed(total_time: Duration) -> ColoredString {
    format!("{:.2}s", total_time.as_secs_f64()).bold().yellow()
}
