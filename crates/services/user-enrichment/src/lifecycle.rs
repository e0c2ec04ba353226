//! Process lifecycle - signal handling and the shutdown sequence.
//!
//! A shutdown signal first cancels `draining`, which stops the listener and
//! lets in-flight requests finish. If they are still running once the grace
//! period is over, `abort` is cancelled; every request token is a child of
//! it, so pending lookups and queries return `Cancelled`.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Shutdown tokens owned by the running server.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    draining: CancellationToken,
    abort: CancellationToken,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancelled when the server should stop accepting connections.
    pub fn draining(&self) -> CancellationToken {
        self.draining.clone()
    }

    /// Parent of all per-request tokens.
    pub fn abort(&self) -> CancellationToken {
        self.abort.clone()
    }

    /// Spawn the watchdog driving both tokens from `signal`.
    ///
    /// The returned handle should be aborted once the server has stopped.
    pub fn watch<S>(&self, signal: S, grace: Duration) -> JoinHandle<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let draining = self.draining.clone();
        let abort = self.abort.clone();

        tokio::spawn(async move {
            signal.await;
            info!(
                grace_seconds = grace.as_secs(),
                "Shutdown signal received, draining in-flight requests"
            );
            draining.cancel();

            tokio::time::sleep(grace).await;
            warn!("Grace period exceeded, cancelling in-flight requests");
            abort.cancel();
        })
    }
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM, falling back to Ctrl+C");
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tokens_stay_live_without_signal() {
        let lifecycle = Lifecycle::new();
        let watchdog = lifecycle.watch(std::future::pending(), Duration::from_millis(1));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!lifecycle.draining().is_cancelled());
        assert!(!lifecycle.abort().is_cancelled());
        watchdog.abort();
    }

    #[tokio::test]
    async fn signal_drains_before_abort() {
        let lifecycle = Lifecycle::new();
        let request = lifecycle.abort().child_token();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let watchdog = lifecycle.watch(
            async move {
                let _ = rx.await;
            },
            Duration::from_millis(200),
        );
        tx.send(()).unwrap();

        lifecycle.draining().cancelled().await;
        assert!(!request.is_cancelled());

        tokio::time::timeout(Duration::from_secs(5), request.cancelled())
            .await
            .unwrap();
        assert!(lifecycle.abort().is_cancelled());
        watchdog.await.unwrap();
    }
}
