//! Out-of-band refresh signals for active poll streams.
//!
//! A [`TriggerSource`] is owned by whoever wires mutations to subscriptions
//! (one per resource kind in the facade); observers are handed out per
//! subscription. Built on a watch channel so that a pulse reaches every
//! observer, and pulses arriving while an observer is busy coalesce into a
//! single wakeup instead of queueing.

use tokio::sync::watch;

/// Write side of a trigger channel.
#[derive(Debug)]
pub struct TriggerSource {
    tx: watch::Sender<u64>,
}

impl TriggerSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Asks every observer to fetch again soon. Best-effort: an observer that
    /// is mid-fetch performs at most one follow-up fetch no matter how many
    /// pulses arrived in the meantime, and the caller gets no acknowledgment.
    pub fn pulse(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    pub fn observe(&self) -> TriggerObserver {
        TriggerObserver {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for TriggerSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of a trigger channel, held by one poll stream.
#[derive(Debug)]
pub struct TriggerObserver {
    rx: watch::Receiver<u64>,
}

impl TriggerObserver {
    /// Completes once a pulse newer than the last one seen by this observer
    /// arrives. Never completes again after the source is dropped.
    pub async fn triggered(&mut self) {
        if self.rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pulse_wakes_an_observer() {
        let source = TriggerSource::new();
        let mut observer = source.observe();
        source.pulse();
        observer.triggered().await;
    }

    #[tokio::test]
    async fn pulses_coalesce_per_observer() {
        let source = TriggerSource::new();
        let mut observer = source.observe();

        source.pulse();
        source.pulse();
        observer.triggered().await;

        // Both pulses were consumed by the single wakeup above.
        let pending = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            observer.triggered(),
        )
        .await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn every_observer_sees_a_pulse() {
        let source = TriggerSource::new();
        let mut first = source.observe();
        let mut second = source.observe();
        source.pulse();
        first.triggered().await;
        second.triggered().await;
    }

    #[tokio::test]
    async fn dropped_source_never_wakes() {
        let source = TriggerSource::new();
        let mut observer = source.observe();
        drop(source);

        let pending = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            observer.triggered(),
        )
        .await;
        assert!(pending.is_err());
    }
}
