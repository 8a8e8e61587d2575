//! Parallel file processing utilities.

use anyhow::{Result, bail};
use rayon::prelude::*;

/// Result of a parallel batch operation.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn ok_or_bail(&self, operation: &str) -> Result<()> {
        if self.failed > 0 {
            bail!("{operation} failed: {} succeeded, {} failed", self.succeeded, self.failed);
        }
        Ok(())
    }
}

/// Process items in parallel with consistent error reporting.
///
/// Errors are printed with their context chain; the batch itself never fails.
pub fn run_parallel<T, R, F>(label: &str, items: impl IntoIterator<Item = T>, op: F) -> BatchResult
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R> + Sync,
{
    let items: Vec<T> = items.into_iter().collect();
    let results: Vec<_> = items.into_par_iter().map(&op).collect();

    let mut result = BatchResult::default();
    for r in &results {
        if let Err(e) = r {
            eprintln!("Error: {e:?}");
            result.failed += 1;
        } else {
            result.succeeded += 1;
        }
    }

    println!("{label}: {} succeeded, {} failed", result.succeeded, result.failed);
    result
}
