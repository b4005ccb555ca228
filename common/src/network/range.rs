//! # Address Range Expressions
//!
//! Compact dotted patterns where every part is either a single value or an
//! inclusive `start-end` span:
//!
//! * `192.168.1.1` is one address.
//! * `192.168.33.1-245` walks the last octet.
//! * `10.0.1-2.5-10` walks the third and fourth octets.
//!
//! Expansion is the cartesian product of the four parts, first octet
//! outermost and the last octet varying fastest.

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::RangeError;

const PARTS: usize = 4;
const OCTET_MAX: u32 = 255;

/// Inclusive bounds of one part.
///
/// Bounds are kept wider than an octet on purpose: values above 255 are
/// only rejected once an address is generated from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctetSpan {
    pub start: u32,
    pub end: u32,
}

impl OctetSpan {
    pub fn single(value: u32) -> Self {
        Self { start: value, end: value }
    }

    pub fn width(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }
}

/// A parsed, not yet expanded, range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeExpression {
    spans: [OctetSpan; PARTS],
}

impl FromStr for RangeExpression {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != PARTS {
            return Err(RangeError::PartCount { found: parts.len() });
        }

        let mut spans = [OctetSpan::single(0); PARTS];
        for (idx, part) in parts.iter().enumerate() {
            spans[idx] = parse_part(idx, part)?;
        }

        Ok(Self { spans })
    }
}

impl RangeExpression {
    /// Number of combinations the expression denotes, valid or not.
    ///
    /// Saturates at `u64::MAX` for bounds far past 255.
    pub fn combinations(&self) -> u64 {
        self.spans
            .iter()
            .try_fold(1u64, |acc, span| acc.checked_mul(span.width()))
            .unwrap_or(u64::MAX)
    }

    /// Lazily walks every combination.
    ///
    /// Yields an error for the first combination holding an octet above
    /// 255 and stops there.
    pub fn iter(&self) -> Targets {
        Targets {
            spans: self.spans,
            cursor: self.spans.map(|span| span.start),
            done: false,
        }
    }

    /// Materializes every address, failing on the first invalid one.
    pub fn expand(&self) -> Result<Vec<Ipv4Addr>, RangeError> {
        let capacity = usize::try_from(self.combinations()).unwrap_or(usize::MAX).min(1 << 16);
        let mut addrs: Vec<Ipv4Addr> = Vec::with_capacity(capacity);
        for addr in self.iter() {
            addrs.push(addr?);
        }

        if addrs.is_empty() {
            return Err(RangeError::EmptyResult);
        }
        Ok(addrs)
    }
}

/// Parses and expands `s` in one step.
pub fn expand(s: &str) -> Result<Vec<Ipv4Addr>, RangeError> {
    s.parse::<RangeExpression>()?.expand()
}

/// Odometer over the four spans, last octet fastest.
#[derive(Debug, Clone)]
pub struct Targets {
    spans: [OctetSpan; PARTS],
    cursor: [u32; PARTS],
    done: bool,
}

impl Iterator for Targets {
    type Item = Result<Ipv4Addr, RangeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = self.cursor;
        self.advance();

        if current.iter().any(|&octet| octet > OCTET_MAX) {
            self.done = true;
            return Some(Err(RangeError::OctetOutOfRange(current)));
        }

        let [a, b, c, d] = current.map(|octet| octet as u8);
        Some(Ok(Ipv4Addr::new(a, b, c, d)))
    }
}

impl Targets {
    fn advance(&mut self) {
        for idx in (0..PARTS).rev() {
            if self.cursor[idx] < self.spans[idx].end {
                self.cursor[idx] += 1;
                for later in idx + 1..PARTS {
                    self.cursor[later] = self.spans[later].start;
                }
                return;
            }
        }
        self.done = true;
    }
}

fn parse_part(part: usize, text: &str) -> Result<OctetSpan, RangeError> {
    if !text.contains('-') {
        let value = text.parse::<u32>().map_err(|_| RangeError::InvalidValue {
            part,
            text: text.to_string(),
        })?;
        return Ok(OctetSpan::single(value));
    }

    let bounds: Vec<&str> = text.split('-').collect();
    let [start_str, end_str] = bounds.as_slice() else {
        return Err(RangeError::MalformedRange {
            part,
            text: text.to_string(),
        });
    };

    let start = start_str.parse::<u32>().map_err(|_| RangeError::InvalidStart {
        part,
        text: start_str.to_string(),
    })?;
    let end = end_str.parse::<u32>().map_err(|_| RangeError::InvalidEnd {
        part,
        text: end_str.to_string(),
    })?;

    if start > end {
        return Err(RangeError::InvertedRange { part, start, end });
    }

    Ok(OctetSpan { start, end })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
