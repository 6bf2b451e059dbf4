//! Polling loop that drives an asynchronous generation task to a terminal
//! state within a fixed attempt budget.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::codec::RawResult;
use crate::error::BoardError;

/// Delay between consecutive status queries.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Number of status queries issued before giving up (~120 s budget).
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Status of an asynchronous generation task.
#[derive(Debug, Clone)]
pub enum TaskStatus {
    /// Accepted by the provider but not started.
    Submitted,
    /// In progress.
    Running,
    /// Terminal: finished, results available.
    Succeeded(Vec<RawResult>),
    /// Terminal: the provider gave up on the task.
    Failed {
        /// Failure message reported by the provider.
        message: String,
    },
}

/// Boxed future type returned by [`StatusQuery::query`].
pub type QueryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TaskStatus, BoardError>> + Send + 'a>>;

/// Queries the current status of a submitted task.
pub trait StatusQuery: Send + Sync {
    /// Fetch the task's current status from the provider.
    fn query(&self, task_id: &str) -> QueryFuture<'_>;
}

/// Sequential poller: one task, one loop, one blocked caller.
pub struct TaskPoller {
    max_attempts: u32,
    interval: Duration,
}

impl Default for TaskPoller {
    fn default() -> Self {
        Self::new(MAX_POLL_ATTEMPTS, POLL_INTERVAL)
    }
}

impl TaskPoller {
    /// Create a poller with an explicit attempt budget and interval.
    #[must_use]
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self { max_attempts, interval }
    }

    /// Query `source` until the task reaches a terminal state or the
    /// attempt budget runs out.
    ///
    /// A `Failed` status short-circuits: the provider has already given up,
    /// so the task is never re-queried. A failed status query (network or
    /// non-2xx) aborts the whole poll immediately; transient query errors
    /// are not retried.
    ///
    /// # Errors
    ///
    /// [`BoardError::TaskFailed`] on a `Failed` status,
    /// [`BoardError::PollTimeout`] once `max_attempts` queries returned no
    /// terminal state, or whatever error the status query itself raised.
    pub async fn poll(
        &self,
        source: &dyn StatusQuery,
        task_id: &str,
    ) -> Result<Vec<RawResult>, BoardError> {
        let mut attempts: u32 = 0;
        loop {
            let status = source.query(task_id).await?;
            attempts += 1;
            match status {
                TaskStatus::Succeeded(results) => return Ok(results),
                TaskStatus::Failed { message } => return Err(BoardError::TaskFailed { message }),
                TaskStatus::Submitted | TaskStatus::Running => {
                    if attempts >= self.max_attempts {
                        return Err(BoardError::PollTimeout {
                            task_id: task_id.to_string(),
                            attempts,
                        });
                    }
                    tracing::debug!(task_id, attempts, "task not terminal yet, waiting");
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Serves a scripted sequence of status responses and counts queries.
    /// Once the script runs dry it keeps answering `Running`.
    struct Script {
        responses: Mutex<VecDeque<Result<TaskStatus, BoardError>>>,
        queries: AtomicUsize,
    }

    impl Script {
        fn new(responses: Vec<Result<TaskStatus, BoardError>>) -> Self {
            Self { responses: Mutex::new(responses.into()), queries: AtomicUsize::new(0) }
        }

        fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl StatusQuery for Script {
        fn query(&self, _task_id: &str) -> QueryFuture<'_> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            let next = self.responses.lock().unwrap().pop_front();
            Box::pin(async move { next.unwrap_or(Ok(TaskStatus::Running)) })
        }
    }

    fn inline_result() -> RawResult {
        RawResult::Inline { data: "aGVsbG8=".into(), mime_type: None }
    }

    #[tokio::test(start_paused = true)]
    async fn success_after_two_running_takes_three_queries() {
        let script = Script::new(vec![
            Ok(TaskStatus::Running),
            Ok(TaskStatus::Running),
            Ok(TaskStatus::Succeeded(vec![inline_result()])),
        ]);
        let poller = TaskPoller::default();

        let results = poller.poll(&script, "t1").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(script.query_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn submitted_counts_as_non_terminal() {
        let script = Script::new(vec![
            Ok(TaskStatus::Submitted),
            Ok(TaskStatus::Succeeded(vec![inline_result()])),
        ]);
        let poller = TaskPoller::default();

        poller.poll(&script, "t1").await.unwrap();
        assert_eq!(script.query_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn never_terminal_times_out_after_exact_budget() {
        let script = Script::new(vec![]);
        let poller = TaskPoller::new(5, POLL_INTERVAL);

        let err = poller.poll(&script, "t9").await.unwrap_err();
        match err {
            BoardError::PollTimeout { task_id, attempts } => {
                assert_eq!(task_id, "t9");
                assert_eq!(attempts, 5);
            }
            other => panic!("expected PollTimeout, got {other:?}"),
        }
        assert_eq!(script.query_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_short_circuits() {
        let script = Script::new(vec![
            Ok(TaskStatus::Running),
            Ok(TaskStatus::Failed { message: "InternalError.Algo".into() }),
            Ok(TaskStatus::Succeeded(vec![inline_result()])),
        ]);
        let poller = TaskPoller::default();

        let err = poller.poll(&script, "t2").await.unwrap_err();
        match err {
            BoardError::TaskFailed { message } => assert_eq!(message, "InternalError.Algo"),
            other => panic!("expected TaskFailed, got {other:?}"),
        }
        // The failed task is never re-queried.
        assert_eq!(script.query_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn query_error_aborts_immediately() {
        let script = Script::new(vec![Err(BoardError::ProviderError {
            status: 503,
            message: "unavailable".into(),
        })]);
        let poller = TaskPoller::default();

        let err = poller.poll(&script, "t3").await.unwrap_err();
        assert!(matches!(err, BoardError::ProviderError { status: 503, .. }));
        assert_eq!(script.query_count(), 1);
    }
}
