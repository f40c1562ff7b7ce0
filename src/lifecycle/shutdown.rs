//! Shutdown coordination for the service.
//!
//! One broadcast channel fans a single stop out to the HTTP server and the
//! rate-limit sweeper. Clones share the channel, so any holder can stop the
//! whole service.

use tokio::sync::broadcast;

use crate::lifecycle::signals;

#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver that fires once on `trigger`. Subscribe before triggering;
    /// late subscribers never see the stop.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every subscriber. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::info!(notified, "Shutdown triggered");
        notified
    }

    /// Wait for SIGINT or SIGTERM, then trigger.
    pub async fn trigger_on_signal(&self) {
        signals::wait_for_signal().await;
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut sweeper = shutdown.subscribe();

        assert_eq!(shutdown.trigger(), 2);
        assert!(server.recv().await.is_ok());
        assert!(sweeper.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_clone_triggers_shared_channel() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        let handle = shutdown.clone();
        tokio::spawn(async move {
            handle.trigger();
        });

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(matches!(received, Ok(Ok(()))));
    }

    #[test]
    fn test_trigger_without_subscribers() {
        let shutdown = Shutdown::default();
        assert_eq!(shutdown.trigger(), 0);
        // Late subscribers miss an earlier stop.
        let mut late = shutdown.subscribe();
        assert!(late.try_recv().is_err());
    }
}
