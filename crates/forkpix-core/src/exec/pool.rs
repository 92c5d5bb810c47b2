use std::sync::{Arc, Condvar, Mutex, PoisonError};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{Error, Result};

/// A dedicated rayon pool with an exact number of worker threads.
///
/// Pools are cheap to build relative to a benchmark run, and each run gets
/// its own so timings for different worker counts never share threads.
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
    exits: Arc<ExitCount>,
}

/// Worker threads that have run their exit handler.
#[derive(Default)]
struct ExitCount {
    exited: Mutex<usize>,
    changed: Condvar,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidWorkerCount(workers));
        }
        let exits = Arc::new(ExitCount::default());
        let on_exit = Arc::clone(&exits);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("forkpix-worker-{i}"))
            .exit_handler(move |_| {
                let mut exited = on_exit.exited.lock().unwrap_or_else(PoisonError::into_inner);
                *exited += 1;
                on_exit.changed.notify_all();
            })
            .build()?;
        debug!(workers, "built worker pool");
        Ok(Self {
            pool,
            workers,
            exits,
        })
    }

    /// Drop the pool and block until every worker thread has exited.
    ///
    /// Dropping a rayon pool only signals its threads; this returns once all
    /// of them are gone, so the next pool starts on an otherwise idle machine.
    /// Returns the number of threads that exited.
    pub fn shutdown(self) -> usize {
        let Self {
            pool,
            workers,
            exits,
        } = self;
        drop(pool);

        let mut exited = exits.exited.lock().unwrap_or_else(PoisonError::into_inner);
        while *exited < workers {
            exited = exits
                .changed
                .wait(exited)
                .unwrap_or_else(PoisonError::into_inner);
        }
        debug!(workers, "worker pool shut down");
        *exited
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `op` inside the pool; `rayon::join` calls made by `op` execute on
    /// this pool's threads.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}
