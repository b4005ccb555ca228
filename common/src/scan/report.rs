use std::net::Ipv4Addr;

use super::outcome::ProbeOutcome;

/// Outcomes in arrival order plus running tallies.
///
/// The tallies are updated on every [`push`](Self::push), so
/// `success_count() + failure_count() == len()` holds at all times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    outcomes: Vec<ProbeOutcome>,
    success_count: usize,
    failure_count: usize,
}

impl AggregateReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn push(&mut self, outcome: ProbeOutcome) {
        if outcome.succeeded() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, address: Ipv4Addr) -> Option<&ProbeOutcome> {
        self.outcomes.iter().find(|outcome| outcome.address == address)
    }

    /// Replaces arrival order with ascending address order.
    pub fn sort_by_address(&mut self) {
        self.outcomes.sort_by_key(|outcome| outcome.address);
    }
}

impl FromIterator<ProbeOutcome> for AggregateReport {
    fn from_iter<I: IntoIterator<Item = ProbeOutcome>>(iter: I) -> Self {
        let mut report = Self::new();
        for outcome in iter {
            report.push(outcome);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(10, 0, 0, last)
    }

    #[test]
    fn counts_track_every_push() {
        let report: AggregateReport = vec![
            ProbeOutcome::identified(addr(3), "ID=debian"),
            ProbeOutcome::failed(addr(1), "Host unreachable"),
            ProbeOutcome::failed(addr(2), "failed to dial: connection refused"),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.len(), 3);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.success_count() + report.failure_count(), report.len());
    }

    #[test]
    fn sorting_keeps_counts_and_orders_addresses() {
        let mut report: AggregateReport = [9, 2, 5]
            .into_iter()
            .map(|last| ProbeOutcome::failed(addr(last), "x"))
            .collect();
        report.sort_by_address();

        let order: Vec<Ipv4Addr> = report.outcomes().iter().map(|o| o.address).collect();
        assert_eq!(order, vec![addr(2), addr(5), addr(9)]);
        assert_eq!(report.failure_count(), 3);
    }

    #[test]
    fn lookup_by_address() {
        let report: AggregateReport =
            std::iter::once(ProbeOutcome::identified(addr(7), "NAME=Alpine")).collect();
        assert_eq!(report.get(addr(7)).and_then(|o| o.payload()), Some("NAME=Alpine"));
        assert!(report.get(addr(8)).is_none());
    }
}
