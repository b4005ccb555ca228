//! Cross-crate tests: range expansion feeding the coordinator, fake and
//! loopback networks, and the result file written at the end.

#[cfg(test)]
mod scan;
#[cfg(test)]
mod support;
