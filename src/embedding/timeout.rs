//! Bounded-latency wrapper for embedding backends.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender, bounded, unbounded};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::Embedder;
use crate::error::{AlignError, Result};

type Rows = Result<Vec<Vec<f32>>>;

struct Job {
    texts: Vec<String>,
    deadline: Instant,
    reply: Sender<Rows>,
}

/// Runs calls of the inner embedder on one long-lived worker thread and
/// gives up on a call after `timeout`.
///
/// Calls are served one at a time in arrival order. A call that times out
/// keeps the worker busy until the backend returns, so calls queued behind
/// it wait too; queued calls whose caller already gave up are skipped.
pub struct TimeoutEmbedder {
    inner: Arc<dyn Embedder>,
    timeout: Duration,
    worker: Mutex<Option<Sender<Job>>>,
}

impl TimeoutEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            worker: Mutex::new(None),
        }
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Queue a job, starting the worker on first use or after it exited.
    fn submit(&self, job: Job) -> Result<()> {
        let mut worker = self.worker.lock();
        let job = match worker.as_ref() {
            Some(jobs) => match jobs.send(job) {
                Ok(()) => return Ok(()),
                Err(returned) => returned.into_inner(),
            },
            None => job,
        };

        let jobs = spawn_worker(Arc::clone(&self.inner))?;
        jobs.send(job).map_err(|_| {
            AlignError::Embedding(format!("{} embedding worker is not running", self.inner.name()))
        })?;
        *worker = Some(jobs);
        Ok(())
    }
}

fn spawn_worker(inner: Arc<dyn Embedder>) -> Result<Sender<Job>> {
    let (jobs, queue) = unbounded::<Job>();
    thread::Builder::new()
        .name("termalign-embed".to_string())
        .spawn(move || {
            for job in queue {
                if Instant::now() >= job.deadline {
                    debug!(backend = inner.name(), "skipping embedding call its caller gave up on");
                    continue;
                }
                let rows = catch_unwind(AssertUnwindSafe(|| inner.embed_batch(&job.texts)))
                    .unwrap_or_else(|_| {
                        Err(AlignError::Embedding(format!(
                            "{} embedding backend panicked",
                            inner.name()
                        )))
                    });
                // Receiver is gone when the caller timed out.
                let _ = job.reply.send(rows);
            }
        })
        .map_err(|err| AlignError::Embedding(format!("spawn embedding worker: {err}")))?;
    Ok(jobs)
}

impl Embedder for TimeoutEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let (reply, rx) = bounded(1);
        let started = Instant::now();
        self.submit(Job {
            texts: texts.to_vec(),
            deadline: started + self.timeout,
            reply,
        })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                let elapsed = started.elapsed();
                warn!(
                    backend = self.inner.name(),
                    elapsed_ms = elapsed.as_millis(),
                    "embedding call timed out"
                );
                Err(AlignError::ProviderTimeout { elapsed })
            }
            Err(RecvTimeoutError::Disconnected) => Err(AlignError::Embedding(format!(
                "{} embedding worker exited without a result",
                self.inner.name()
            ))),
        }
    }

    fn dims(&self) -> usize {
        self.inner.dims()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
