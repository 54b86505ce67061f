//! Concurrent fan-out aggregation
//!
//! A [`FanOut`] job runs independent sub-tasks concurrently and reduces them
//! to a single outcome:
//!
//! ```text
//!            ┌──────────┐
//!  spawn ──▶ │ sub-task │──ok──▶ collector (Mutex<Vec<T>>)
//!  spawn ──▶ │ sub-task │──err─▶ error slot (first write wins) ──▶ cancel
//!  spawn ──▶ │ sub-task │
//!            └──────────┘
//!                 │
//!               join ──▶ Ok(collector) | Err(first error)
//! ```
//!
//! ## Semantics
//!
//! - Sub-tasks start in spawn order; completion order is unspecified, so the
//!   collector has set semantics.
//! - There is no concurrency limit.
//! - The first error observed cancels the shared token. Sub-tasks that have
//!   not started skip their work; running sub-tasks may poll
//!   [`SubTask::checkpoint`] between steps. In-flight calls are not aborted.
//! - [`FanOut::join`] is a barrier: it returns only after every sub-task has
//!   finished. Any failure discards partial successes.
//! - The collector lock is held only for the append, never across an await.

use crate::error::{Result, ServiceError};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, error};

/// Handle given to each sub-task
#[derive(Debug, Clone)]
pub struct SubTask {
    index: usize,
    token: CancellationToken,
}

impl SubTask {
    /// Position of this sub-task in spawn order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether another sub-task of the job has already failed
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop here if the job has been cancelled
    ///
    /// Returns an `Aborted` error once cancelled. The job keeps the error that
    /// caused the cancellation, so this one is discarded.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ServiceError::aborted("fan-out cancelled after an earlier failure"));
        }
        Ok(())
    }
}

/// One aggregation job
///
/// Created per inbound request and consumed by [`FanOut::join`]. Dropping a
/// job without joining aborts its sub-tasks.
pub struct FanOut<T> {
    label: String,
    tasks: JoinSet<()>,
    collector: Arc<Mutex<Vec<T>>>,
    error: Arc<Mutex<Option<ServiceError>>>,
    token: CancellationToken,
    spawned: usize,
}

impl<T> std::fmt::Debug for FanOut<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOut")
            .field("label", &self.label)
            .field("spawned", &self.spawned)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl<T: Send + 'static> FanOut<T> {
    /// Create an empty job; `label` names the job in logs
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tasks: JoinSet::new(),
            collector: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
            token: CancellationToken::new(),
            spawned: 0,
        }
    }

    /// Number of sub-tasks spawned so far
    pub fn len(&self) -> usize {
        self.spawned
    }

    /// Whether no sub-task has been spawned
    pub fn is_empty(&self) -> bool {
        self.spawned == 0
    }

    /// Spawn a sub-task
    ///
    /// `f` is called immediately to build the sub-task's future; the future
    /// itself runs on the runtime and is skipped if the job is cancelled
    /// before it starts.
    pub fn spawn<F, Fut>(&mut self, f: F)
    where
        F: FnOnce(SubTask) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let index = self.spawned;
        self.spawned += 1;

        let fut = f(SubTask {
            index,
            token: self.token.clone(),
        });

        let collector = Arc::clone(&self.collector);
        let slot = Arc::clone(&self.error);
        let token = self.token.clone();
        let span = debug_span!("fan_out_task", job = %self.label, index);

        self.tasks.spawn(
            async move {
                if token.is_cancelled() {
                    debug!("Job already failed, skipping sub-task");
                    return;
                }

                match fut.await {
                    Ok(value) => {
                        collector
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(value);
                    }
                    Err(e) => record_failure(&slot, &token, e),
                }
            }
            .instrument(span),
        );
    }

    /// Wait for every sub-task and reduce to one outcome
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<T>)`: every sub-task succeeded; one entry per sub-task in
    ///   completion order
    /// - `Err(ServiceError)`: the first error observed
    pub async fn join(mut self) -> Result<Vec<T>> {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(join_err) = joined {
                record_failure(
                    &self.error,
                    &self.token,
                    ServiceError::internal(format!("fan-out sub-task did not complete: {}", join_err)),
                );
            }
        }

        let failure = self
            .error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(e) = failure {
            debug!(job = %self.label, "Fan-out failed: {}", e);
            return Err(e);
        }

        let results =
            std::mem::take(&mut *self.collector.lock().unwrap_or_else(PoisonError::into_inner));
        debug!(job = %self.label, results = results.len(), "Fan-out complete");
        Ok(results)
    }
}

/// Store `err` if the slot is empty and cancel the job
fn record_failure(slot: &Mutex<Option<ServiceError>>, token: &CancellationToken, err: ServiceError) {
    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        error!(kind = %err.kind(), "Sub-task failed, cancelling fan-out: {}", err);
        *slot = Some(err);
        token.cancel();
    } else {
        debug!("Discarding later sub-task error: {}", err);
    }
}

/// Run `f` once per item concurrently and join
///
/// Convenience wrapper around [`FanOut`] for the common "one sub-task per
/// input item" shape.
pub async fn fan_out<I, F, Fut, T>(label: &str, items: I, f: F) -> Result<Vec<T>>
where
    I: IntoIterator,
    F: Fn(I::Item, SubTask) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let mut job = FanOut::new(label);
    for item in items {
        job.spawn(|task| f(item, task));
    }
    job.join().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn empty_job_succeeds_with_no_results() {
        let job: FanOut<u32> = FanOut::new("empty");
        assert!(job.is_empty());
        assert_eq!(job.join().await.unwrap(), Vec::<u32>::new());
    }

    #[tokio::test]
    async fn all_successes_collect_one_entry_each() {
        let mut results = fan_out("squares", 0..10u32, |n, _task| async move { Ok(n * n) })
            .await
            .unwrap();
        results.sort_unstable();
        assert_eq!(results, vec![0, 1, 4, 9, 16, 25, 36, 49, 64, 81]);
    }

    #[tokio::test]
    async fn single_failure_collapses_the_job() {
        let err = fan_out("one-bad", 0..8u32, |n, _task| async move {
            if n == 3 {
                Err(ServiceError::not_found("MX lookup failed"))
            } else {
                Ok(n)
            }
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "MX lookup failed");
    }

    #[tokio::test]
    async fn first_observed_error_wins() {
        let mut job = FanOut::<()>::new("ordered-failures");
        job.spawn(|_| async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Err(ServiceError::internal("late"))
        });
        job.spawn(|_| async { Err(ServiceError::unavailable("early")) });

        let err = job.join().await.unwrap_err();
        assert_eq!(err.message(), "early");
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn running_sub_task_observes_cancellation_at_checkpoint() {
        let second_step = Arc::new(AtomicUsize::new(0));

        let mut job = FanOut::<()>::new("cooperative");
        job.spawn(|_| async { Err(ServiceError::internal("boom")) });
        let counter = Arc::clone(&second_step);
        job.spawn(move |task| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            task.checkpoint()?;
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let err = job.join().await.unwrap_err();
        assert_eq!(err.message(), "boom");
        assert_eq!(second_step.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn panicking_sub_task_is_internal() {
        let mut job = FanOut::<u32>::new("panics");
        job.spawn(|_| async { Ok(1) });
        job.spawn(|_| async { panic!("sub-task exploded") });

        let err = job.join().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn sub_task_index_follows_spawn_order() {
        let mut indices = fan_out("indices", ["a", "b", "c"], |_, task| async move {
            Ok(task.index())
        })
        .await
        .unwrap();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
