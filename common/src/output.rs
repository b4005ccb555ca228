//! # Result File
//!
//! One record per outcome, `{<address>:<payload-or-reason>}`, in report
//! order. Payloads are written verbatim, so an os-release payload spans
//! several physical lines; the reader rejoins them.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::net::Ipv4Addr;
use std::path::Path;

use crate::error::SinkError;
use crate::scan::outcome::ProbeOutcome;
use crate::scan::report::AggregateReport;

/// A record as read back from a result file.
pub type Record = (Ipv4Addr, String);

pub fn format_record(outcome: &ProbeOutcome) -> String {
    format!("{{{}:{}}}", outcome.address, outcome.text())
}

/// Creates or truncates `path` and writes every outcome of `report`.
///
/// Not atomic: records written before a failure stay on disk.
pub fn write_results(report: &AggregateReport, path: &Path) -> Result<(), SinkError> {
    let to_sink_error = |source: io::Error| SinkError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_sink_error)?;
    let mut writer = BufWriter::new(file);
    write_records(report, &mut writer).map_err(to_sink_error)?;
    writer.flush().map_err(to_sink_error)
}

pub fn write_records<W: Write>(report: &AggregateReport, writer: &mut W) -> io::Result<()> {
    for outcome in report.outcomes() {
        writeln!(writer, "{}", format_record(outcome))?;
    }
    Ok(())
}

pub fn read_results(path: &Path) -> Result<Vec<Record>, SinkError> {
    let text = fs::read_to_string(path).map_err(|source| SinkError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&text)
}

/// Splits result file text back into records.
///
/// A record starts on a line opening with `{<ipv4>:`; lines that don't are
/// continuation lines of the previous payload.
pub fn parse_records(text: &str) -> Result<Vec<Record>, SinkError> {
    let mut records: Vec<Record> = Vec::new();
    let mut current: Option<(usize, Ipv4Addr, String)> = None;

    for (idx, line) in text.split_terminator('\n').enumerate() {
        let line_no = idx + 1;

        if let Some((addr, rest)) = record_start(line) {
            if let Some(open) = current.take() {
                records.push(close_record(open)?);
            }
            current = Some((line_no, addr, rest.to_string()));
            continue;
        }

        match current.as_mut() {
            Some((_, _, body)) => {
                body.push('\n');
                body.push_str(line);
            }
            None => {
                return Err(SinkError::Malformed {
                    line: line_no,
                    text: line.to_string(),
                });
            }
        }
    }

    if let Some(open) = current {
        records.push(close_record(open)?);
    }
    Ok(records)
}

fn record_start(line: &str) -> Option<(Ipv4Addr, &str)> {
    let inner = line.strip_prefix('{')?;
    let (addr, rest) = inner.split_once(':')?;
    let addr = addr.parse::<Ipv4Addr>().ok()?;
    Some((addr, rest))
}

fn close_record((line, addr, mut body): (usize, Ipv4Addr, String)) -> Result<Record, SinkError> {
    if !body.ends_with('}') {
        return Err(SinkError::Malformed { line, text: body });
    }
    body.pop();
    Ok((addr, body))
}
