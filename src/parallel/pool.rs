//! Rayon thread pool configuration for batch planning.
//!
//! [WorkerPool::install] runs a closure on a pool with a fixed number of
//! threads, or on Rayon's global pool (all CPU cores) when the count is 0.

use rayon::ThreadPoolBuilder;

use crate::error::{Result, SolverError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the Rayon default.
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    pub fn install<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|err| SolverError::Unsupported(format!("worker pool: {err}")))?;
        Ok(pool.install(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pool_uses_requested_thread_count() {
        let threads = WorkerPool::with_workers(2)
            .install(rayon::current_num_threads)
            .expect("pool builds");
        assert_eq!(threads, 2);
    }

    #[test]
    fn default_pool_runs_inline() {
        let value = WorkerPool::default().install(|| 7).expect("no pool needed");
        assert_eq!(value, 7);
    }
}
