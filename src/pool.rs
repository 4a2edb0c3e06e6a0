use rayon::ThreadPoolBuilder;

/// Zero means Rayon's global pool, one thread per core.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                tracing::warn!(workers = self.workers, %err, "could not build worker pool, using global pool");
                f()
            }
        }
    }

    pub fn current_parallelism(&self) -> usize {
        if self.workers == 0 {
            rayon::current_num_threads()
        } else {
            self.workers
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pool_runs_on_requested_threads() {
        let threads = WorkerPool::with_workers(2).install(rayon::current_num_threads);
        assert_eq!(threads, 2);
    }

    #[test]
    fn default_pool_uses_global_threads() {
        let pool = WorkerPool::default();
        assert_eq!(pool.current_parallelism(), rayon::current_num_threads());
    }
}
