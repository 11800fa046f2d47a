//! Xaction tracker: poll an asynchronous cluster operation to completion
//!
//! The cluster is the single source of truth for xaction state, so multiple
//! waiters may poll the same id with no client-side coordination. The loop
//! here never busy-polls: the first status query fires immediately (an
//! already-terminal id returns without sleeping), then the interval doubles
//! up to the configured cap. The wall-clock deadline is enforced here,
//! independent of the transport's per-request timeout, and transient
//! transport failures are tolerated up to a budget of consecutive misses.

use async_trait::async_trait;
use tokio::time::Instant;

use ac_core::xaction::{PollObservation, XactPhase, next_phase};
use ac_core::{Error, PollConfig, Result, XactStatus};

/// Source of xaction status reports, a seam for testing the polling loop
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait XactStatusSource: Send + Sync {
    /// One status query; `XactionNotFound` when the cluster does not
    /// recognize the id.
    async fn poll_status(&self, id: &str) -> Result<XactStatus>;
}

/// Poll `source` until the xaction reaches a terminal phase.
///
/// Returns the terminal phase: operation failure still counts as "finished"
/// for waiting purposes and comes back as `Ok(XactPhase::Failed)`; callers
/// inspect the outcome separately when they care. Errors are reserved for
/// the wait itself going wrong: `Timeout` on deadline, `XactionNotFound` for
/// unknown ids, or the last transport error once the failure budget is
/// spent.
pub(crate) async fn wait_until_finished<S>(
    source: &S,
    id: &str,
    deadline: std::time::Duration,
    poll: &PollConfig,
) -> Result<XactPhase>
where
    S: XactStatusSource + ?Sized,
{
    if id.is_empty() {
        return Err(Error::InvalidArgument(
            "cannot wait on an empty xaction id".to_string(),
        ));
    }

    let started = Instant::now();
    let mut phase = XactPhase::Submitted;
    let mut interval = poll.initial_interval();
    let mut misses = 0u32;

    loop {
        let observation = match source.poll_status(id).await {
            Ok(status) => {
                misses = 0;
                PollObservation::Reported(status)
            }
            Err(Error::XactionNotFound(_)) => PollObservation::Missing,
            Err(e) if e.is_retryable() => {
                misses += 1;
                tracing::debug!(xaction = id, misses, error = %e, "status poll failed");
                if misses >= poll.failure_budget {
                    return Err(e);
                }
                PollObservation::Unreachable
            }
            Err(e) => return Err(e),
        };

        phase = next_phase(phase, &observation);
        if matches!(phase, XactPhase::UnknownId) {
            return Err(Error::XactionNotFound(id.to_string()));
        }
        if phase.is_terminal() {
            tracing::debug!(xaction = id, phase = %phase, elapsed = ?started.elapsed(), "xaction finished");
            return Ok(phase);
        }

        let elapsed = started.elapsed();
        if elapsed >= deadline {
            return Err(Error::Timeout {
                id: id.to_string(),
                elapsed,
            });
        }
        tokio::time::sleep(interval.min(deadline - elapsed)).await;
        interval = (interval * 2).min(poll.max_interval());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn finished() -> XactStatus {
        XactStatus {
            uuid: "x1".into(),
            end_time: 1_700_000_000_000_000_000,
            ..XactStatus::default()
        }
    }

    fn aborted() -> XactStatus {
        XactStatus {
            aborted: true,
            ..finished()
        }
    }

    fn poll_config() -> PollConfig {
        PollConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_id_returns_without_sleeping() {
        let mut source = MockXactStatusSource::new();
        source
            .expect_poll_status()
            .times(1)
            .returning(|_| Ok(finished()));

        let before = Instant::now();
        let phase = wait_until_finished(&source, "x1", Duration::from_secs(300), &poll_config())
            .await
            .unwrap();
        assert_eq!(phase, XactPhase::Succeeded);
        // No sleep happened: paused time did not advance.
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_is_idempotent_on_terminal_id() {
        let mut source = MockXactStatusSource::new();
        source
            .expect_poll_status()
            .times(2)
            .returning(|_| Ok(finished()));

        let first = wait_until_finished(&source, "x1", Duration::from_secs(300), &poll_config())
            .await
            .unwrap();
        let second = wait_until_finished(&source, "x1", Duration::from_secs(300), &poll_config())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_then_succeeded() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut source = MockXactStatusSource::new();
        source.expect_poll_status().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                Ok(XactStatus::default())
            } else {
                Ok(finished())
            }
        });

        let phase = wait_until_finished(&source, "x1", Duration::from_secs(300), &poll_config())
            .await
            .unwrap();
        assert_eq!(phase, XactPhase::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_failure_counts_as_finished() {
        let mut source = MockXactStatusSource::new();
        source
            .expect_poll_status()
            .times(1)
            .returning(|_| Ok(aborted()));

        let phase = wait_until_finished(&source, "x1", Duration::from_secs(300), &poll_config())
            .await
            .unwrap();
        assert_eq!(phase, XactPhase::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id() {
        let mut source = MockXactStatusSource::new();
        source
            .expect_poll_status()
            .times(1)
            .returning(|id| Err(Error::XactionNotFound(id.to_string())));

        let err = wait_until_finished(&source, "gone", Duration::from_secs(300), &poll_config())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::XactionNotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_within_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut source = MockXactStatusSource::new();
        source.expect_poll_status().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(Error::Transport("connection reset".to_string()))
            } else {
                Ok(finished())
            }
        });

        let phase = wait_until_finished(&source, "x1", Duration::from_secs(300), &poll_config())
            .await
            .unwrap();
        assert_eq!(phase, XactPhase::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_budget_exhaustion() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut source = MockXactStatusSource::new();
        source.expect_poll_status().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Error::Transport("connection refused".to_string()))
        });

        let mut poll = poll_config();
        poll.failure_budget = 3;
        let err = wait_until_finished(&source, "x1", Duration::from_secs(300), &poll)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_surfaces_immediately() {
        let mut source = MockXactStatusSource::new();
        source
            .expect_poll_status()
            .times(1)
            .returning(|_| Err(Error::InvalidArgument("bad id".to_string())));

        let err = wait_until_finished(&source, "x1", Duration::from_secs(300), &poll_config())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses_to_timeout() {
        let mut source = MockXactStatusSource::new();
        source
            .expect_poll_status()
            .returning(|_| Ok(XactStatus::default()));

        let err = wait_until_finished(&source, "x1", Duration::from_secs(2), &poll_config())
            .await
            .unwrap_err();
        match err {
            Error::Timeout { id, elapsed } => {
                assert_eq!(id, "x1");
                assert!(elapsed >= Duration::from_secs(2));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_id_is_rejected() {
        let source = MockXactStatusSource::new();
        let err = wait_until_finished(&source, "", Duration::from_secs(1), &poll_config())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
