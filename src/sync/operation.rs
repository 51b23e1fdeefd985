//! The initiate → poll-status → finalize protocol for server-side
//! asynchronous jobs (VFS directory refresh, VFS file recollection).

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::api::error::{ApiError, ApiResult};

/// Reports whether a server-side job is still in progress.
pub trait OperationStatus {
    fn is_running(&self) -> bool;
}

/// Outcome of a completed operation: the terminal status payload observed at
/// the moment polling stopped, plus the finalize fetch's value.
#[derive(Debug, Clone)]
pub struct Completed<S, T> {
    pub status: S,
    pub result: T,
}

/// Runs one operation to completion.
///
/// `initiate` must produce the operation id; a nominally successful response
/// without one is a contract violation and fails loudly. The status resource
/// is then polled at `period` (first poll immediate) for as long as it reports
/// a running state. Whether the job itself succeeded is not interpreted here:
/// once the state is terminal, `finalize` runs exactly once and its value is
/// delivered. A transport failure at any step aborts the whole run; retrying
/// means re-invoking the whole sequence.
pub async fn await_operation<S, T, Init, Poll, PollFut, Fin, FinFut>(
    period: Duration,
    initiate: Init,
    mut poll_status: Poll,
    finalize: Fin,
) -> ApiResult<Completed<S, T>>
where
    S: OperationStatus,
    Init: Future<Output = ApiResult<Option<String>>>,
    Poll: FnMut(String) -> PollFut,
    PollFut: Future<Output = ApiResult<S>>,
    Fin: FnOnce() -> FinFut,
    FinFut: Future<Output = ApiResult<T>>,
{
    let operation_id = initiate.await?.ok_or_else(|| {
        ApiError::Contract("operation was accepted but no operation id was returned".to_owned())
    })?;

    let mut ticks = tokio::time::interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let status = loop {
        ticks.tick().await;
        let status = poll_status(operation_id.clone()).await?;
        if !status.is_running() {
            break status;
        }
    };

    let result = finalize().await?;
    Ok(Completed { status, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Status(bool);

    impl OperationStatus for Status {
        fn is_running(&self) -> bool {
            self.0
        }
    }

    const PERIOD: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn polls_until_terminal_then_finalizes_once() {
        let polls = Arc::new(AtomicUsize::new(0));
        let finalizes = Arc::new(AtomicUsize::new(0));

        let completed = await_operation(
            PERIOD,
            async { Ok(Some("op-1".to_owned())) },
            |id| {
                assert_eq!(id, "op-1");
                let n = polls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(Status(n < 2)) }
            },
            || {
                let finalizes = finalizes.clone();
                async move {
                    finalizes.fetch_add(1, Ordering::SeqCst);
                    Ok("V")
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(completed.result, "V");
        assert!(!completed.status.is_running());
        assert_eq!(polls.load(Ordering::SeqCst), 3);
        assert_eq!(finalizes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_operation_id_fails_loudly() {
        let err = await_operation(
            PERIOD,
            async { Ok(None) },
            |_id: String| async { Ok(Status(false)) },
            || async { Ok(()) },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Contract(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn status_failure_aborts_without_finalizing() {
        let finalizes = Arc::new(AtomicUsize::new(0));

        let result: ApiResult<Completed<Status, ()>> = await_operation(
            PERIOD,
            async { Ok(Some("op-1".to_owned())) },
            |_id| async {
                Err(ApiError::Contract("status endpoint exploded".to_owned()))
            },
            || {
                let finalizes = finalizes.clone();
                async move {
                    finalizes.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(finalizes.load(Ordering::SeqCst), 0);
    }
}
