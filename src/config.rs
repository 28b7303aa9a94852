//! Runtime configuration
//!
//! Configuration comes from command-line flags, with environment variables
//! (optionally loaded from a `.env` file) as fallback. See `cli::CliArgs`.

use tracing::warn;

/// Environment variable selecting the matching strategy
pub const STRATEGY_ENV: &str = "RECONCILIATION_STRATEGY";

/// Environment variable overriding the worker count
pub const WORKERS_ENV: &str = "RECONCILIATION_WORKERS";

/// Strategy used when neither flag nor environment names one
pub const DEFAULT_STRATEGY: &str = "indexed";

/// Worker threads per available CPU for the concurrent strategies
pub const WORKERS_PER_CPU: usize = 2;

/// Configuration for the concurrent matchers
///
/// Controls the number of worker threads pulling transactions from the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Number of worker threads
    pub workers: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            workers: WORKERS_PER_CPU * num_cpus::get(),
        }
    }
}

impl WorkerConfig {
    /// Create a WorkerConfig with a custom worker count
    ///
    /// A worker count of zero falls back to the default with a warning.
    pub fn new(workers: usize) -> Self {
        let default = Self::default();

        let workers = if workers == 0 {
            warn!(
                requested = workers,
                default = default.workers,
                "invalid worker count, using default"
            );
            default.workers
        } else {
            workers
        };

        Self { workers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_scales_with_cpus() {
        assert_eq!(WorkerConfig::default().workers, 2 * num_cpus::get());
    }

    #[rstest]
    #[case::custom(8, 8)]
    #[case::single(1, 1)]
    #[case::zero_falls_back(0, 2 * num_cpus::get())]
    fn test_new(#[case] requested: usize, #[case] expected: usize) {
        assert_eq!(WorkerConfig::new(requested).workers, expected);
    }
}
