//! The scheduling primitive: lazy, infinite, restartable poll streams.
//!
//! A poll stream invokes its fetch immediately, then once per interval. At
//! most one fetch is in flight at any instant: ticks (and trigger signals)
//! that elapse while a fetch is outstanding are consumed and dropped, never
//! queued, so consumers only ever observe the most recent completed fetch.
//! The stream never terminates on its own; dropping it stops all future work
//! and discards any in-flight fetch without delivering its result.

use std::future::Future;
use std::time::Duration;

use async_stream::stream;
use futures::stream::Stream;
use tokio::time::MissedTickBehavior;

use super::trigger::TriggerObserver;

/// Emits `fetch()` results forever: one immediately, then one per `period`.
///
/// The error policy is the fetch's own: a fetch returning `Result` yields an
/// `Err` item for a failed tick and the stream continues to the next tick.
pub fn poll<T, F, Fut>(period: Duration, mut fetch: F) -> impl Stream<Item = T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
{
    stream! {
        let mut ticks = tokio::time::interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            let value = {
                let fetch_fut = fetch();
                tokio::pin!(fetch_fut);
                loop {
                    tokio::select! {
                        value = &mut fetch_fut => break value,
                        // Ticks elapsing mid-fetch are exhausted and dropped.
                        _ = ticks.tick() => {}
                    }
                }
            };
            yield value;
        }
    }
}

/// Like [`poll`], with a second wakeup source: a trigger pulse also causes one
/// fetch, so a mutation becomes visible without waiting for the next tick.
///
/// Pulses are subject to the same single-outstanding-fetch rule: a pulse
/// arriving mid-fetch is dropped, and the pusher gets no acknowledgment.
pub fn poll_with_trigger<T, F, Fut>(
    period: Duration,
    mut trigger: TriggerObserver,
    mut fetch: F,
) -> impl Stream<Item = T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
{
    stream! {
        let mut ticks = tokio::time::interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticks.tick() => {}
                _ = trigger.triggered() => {}
            }
            let value = {
                let fetch_fut = fetch();
                tokio::pin!(fetch_fut);
                loop {
                    tokio::select! {
                        value = &mut fetch_fut => break value,
                        _ = ticks.tick() => {}
                        _ = trigger.triggered() => {}
                    }
                }
            };
            yield value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::trigger::TriggerSource;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{Instant, sleep, timeout};

    const PERIOD: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn first_tick_fires_immediately() {
        let start = Instant::now();
        let stream = poll(PERIOD, || async { Instant::now() - start });
        tokio::pin!(stream);

        let elapsed = stream.next().await.unwrap();
        assert_eq!(elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_arrive_at_the_period() {
        let start = Instant::now();
        let stream = poll(PERIOD, || async { Instant::now() - start });
        tokio::pin!(stream);

        assert_eq!(stream.next().await.unwrap(), Duration::ZERO);
        assert_eq!(stream.next().await.unwrap(), Duration::from_secs(5));
        assert_eq!(stream.next().await.unwrap(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetches_never_overlap() {
        let start = Instant::now();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));

        let stream = poll(PERIOD, {
            let in_flight = in_flight.clone();
            let max_in_flight = max_in_flight.clone();
            move || {
                let in_flight = in_flight.clone();
                let max_in_flight = max_in_flight.clone();
                async move {
                    let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_in_flight.fetch_max(current, Ordering::SeqCst);
                    // Three ticks elapse before this resolves.
                    sleep(Duration::from_secs(12)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Instant::now() - start
                }
            }
        });
        tokio::pin!(stream);

        // Missed ticks at 5s and 10s are dropped; the next fetch starts at the
        // 15s tick, only after the first resolved.
        assert_eq!(stream.next().await.unwrap(), Duration::from_secs(12));
        assert_eq!(stream.next().await.unwrap(), Duration::from_secs(27));
        assert_eq!(stream.next().await.unwrap(), Duration::from_secs(42));
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_forces_an_immediate_fetch() {
        let source = TriggerSource::new();
        let start = Instant::now();
        let stream = poll_with_trigger(Duration::from_secs(100), source.observe(), || async {
            Instant::now() - start
        });
        tokio::pin!(stream);

        assert_eq!(stream.next().await.unwrap(), Duration::ZERO);

        source.pulse();
        let elapsed = timeout(Duration::from_secs(50), stream.next())
            .await
            .expect("trigger should fetch without waiting for the next tick")
            .unwrap();
        assert!(elapsed < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn pulses_during_a_fetch_are_dropped() {
        let source = TriggerSource::new();
        let fetches = Arc::new(AtomicUsize::new(0));

        let stream = poll_with_trigger(Duration::from_secs(100), source.observe(), {
            let fetches = fetches.clone();
            move || {
                let fetches = fetches.clone();
                async move {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    sleep(Duration::from_secs(10)).await;
                }
            }
        });
        tokio::pin!(stream);

        let pulser = tokio::spawn(async move {
            sleep(Duration::from_secs(3)).await;
            source.pulse();
            source.pulse();
        });

        stream.next().await.unwrap();
        pulser.await.unwrap();

        // Both pulses landed mid-fetch and were dropped; nothing happens until
        // the next interval tick.
        let idle = timeout(Duration::from_secs(80), stream.next()).await;
        assert!(idle.is_err());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_stream_discards_the_in_flight_fetch() {
        let completed = Arc::new(AtomicUsize::new(0));

        let stream = poll(PERIOD, {
            let completed = completed.clone();
            move || {
                let completed = completed.clone();
                async move {
                    sleep(Duration::from_secs(10)).await;
                    completed.fetch_add(1, Ordering::SeqCst);
                }
            }
        });
        tokio::pin!(stream);

        // Let the first fetch start, then unsubscribe while it is outstanding.
        let pending = timeout(Duration::from_secs(3), stream.next()).await;
        assert!(pending.is_err());
        drop(stream);

        // Even after the fetch's latency elapses, its result is never
        // delivered and its continuation never runs.
        sleep(Duration::from_secs(30)).await;
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_do_not_terminate_the_stream() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stream = poll(PERIOD, {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err("transient")
                    } else {
                        Ok(n)
                    }
                }
            }
        });
        tokio::pin!(stream);

        assert_eq!(stream.next().await.unwrap(), Err("transient"));
        assert_eq!(stream.next().await.unwrap(), Ok(1));
    }
}
