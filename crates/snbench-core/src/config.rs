//! Benchmark run configuration

use crate::filter::FilterSet;
use crate::generator::DEFAULT_BATCH_SIZE;
use crate::{CoreError, Result};

/// What a benchmark run does
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of measured iterations, at least one
    pub iterations: u32,
    /// Purge matching items once before the first iteration
    pub purge_before_tests: bool,
    /// Purge matching items at the end of every iteration
    pub purge_post_iteration: bool,
    /// Notes generated and pushed per iteration
    pub batch_size: usize,
    /// Which items a purge deletes
    pub purge_filters: FilterSet,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            purge_before_tests: false,
            purge_post_iteration: false,
            batch_size: DEFAULT_BATCH_SIZE,
            purge_filters: FilterSet::default(),
        }
    }
}

impl BenchConfig {
    pub fn purges(&self) -> bool {
        self.purge_before_tests || self.purge_post_iteration
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(CoreError::Config("iterations must be at least 1".into()));
        }
        if self.purges() && self.purge_filters.is_empty() {
            return Err(CoreError::Config(
                "purging requires at least one content type filter".into(),
            ));
        }
        Ok(())
    }
}
