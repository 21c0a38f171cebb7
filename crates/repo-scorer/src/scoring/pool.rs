use std::sync::Arc;

use tracing::info;

use super::ScoringError;

/// Process-wide worker pool shared by every composite rule.
///
/// Cloning the handle shares the same underlying threads.
#[derive(Clone)]
pub struct ScoringPool {
    inner: Arc<rayon::ThreadPool>,
}

impl ScoringPool {
    /// Build a pool with `workers` threads; `None` or zero sizes it to the
    /// available hardware parallelism.
    pub fn new(workers: Option<usize>) -> Result<Self, ScoringError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or(0))
            .thread_name(|index| format!("scoring-worker-{index}"))
            .build()?;

        info!(workers = pool.current_num_threads(), "scoring pool ready");

        Ok(Self {
            inner: Arc::new(pool),
        })
    }

    pub fn workers(&self) -> usize {
        self.inner.current_num_threads()
    }

    pub(crate) fn thread_pool(&self) -> &rayon::ThreadPool {
        &self.inner
    }
}

impl std::fmt::Debug for ScoringPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringPool")
            .field("workers", &self.workers())
            .finish()
    }
}
