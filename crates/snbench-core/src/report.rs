//! Timing samples and their aggregation

use std::fmt;
use std::time::Duration;

/// Which operation a sample measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Auth,
    Put,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => f.write_str("auth"),
            Self::Put => f.write_str("put"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    pub kind: OperationKind,
    pub elapsed: Duration,
}

/// Outcome of a benchmark run
#[derive(Debug, Clone, Default)]
pub struct Report {
    samples: Vec<TimingSample>,
    purged: usize,
}

impl Report {
    pub fn record(&mut self, kind: OperationKind, elapsed: Duration) {
        self.samples.push(TimingSample { kind, elapsed });
    }

    pub fn add_purged(&mut self, count: usize) {
        self.purged += count;
    }

    /// All samples in the order they were taken
    pub fn samples(&self) -> &[TimingSample] {
        &self.samples
    }

    pub fn durations(&self, kind: OperationKind) -> Vec<Duration> {
        self.samples
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.elapsed)
            .collect()
    }

    pub fn mean(&self, kind: OperationKind) -> Option<Duration> {
        mean(&self.durations(kind))
    }

    pub fn average_auth(&self) -> Option<Duration> {
        self.mean(OperationKind::Auth)
    }

    pub fn average_put(&self) -> Option<Duration> {
        self.mean(OperationKind::Put)
    }

    /// Items tombstoned across every purge in the run
    pub fn purged(&self) -> usize {
        self.purged
    }
}

/// Arithmetic mean with integer nanosecond division. `None` when empty.
pub fn mean(samples: &[Duration]) -> Option<Duration> {
    let count = u32::try_from(samples.len()).ok().filter(|&n| n > 0)?;
    let total: Duration = samples.iter().sum();
    Some(total / count)
}
