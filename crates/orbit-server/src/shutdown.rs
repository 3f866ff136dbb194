//! Graceful shutdown coordination.
//!
//! [`ShutdownSignal`] tells the accept loop and every open connection to
//! stop. [`ConnectionTracker`] counts the connections still draining so the
//! server can wait for them, up to its shutdown timeout.
//!
//! # Example
//!
//! ```rust
//! use orbit_server::ShutdownSignal;
//!
//! # tokio_test::block_on(async {
//! let shutdown = ShutdownSignal::new();
//! let waiter = shutdown.clone();
//!
//! shutdown.trigger();
//! waiter.recv().await;
//! assert!(waiter.is_shutdown());
//! # });
//! ```

use std::sync::Arc;

use tokio::sync::watch;

/// A cloneable, level-triggered shutdown flag.
///
/// Once triggered it stays triggered. Waiting on an already triggered
/// signal completes immediately.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates a signal that has not been triggered.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Creates a signal that triggers on SIGTERM or Ctrl+C.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            wait_for_os_signal().await;
            tracing::info!("shutdown signal received");
            trigger.trigger();
        });

        signal
    }

    /// Triggers shutdown. Repeated calls have no further effect.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` if shutdown has been triggered.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        *self.sender.borrow()
    }

    /// Completes once shutdown has been triggered.
    pub async fn recv(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = receiver.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for SIGTERM or Ctrl+C.
///
/// If a handler cannot be installed the failure is logged and the other
/// signal is still honoured.
async fn wait_for_os_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Counts open connections.
///
/// Each accepted connection holds a [`ConnectionToken`]; dropping the token
/// releases the slot.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    count: Arc<watch::Sender<usize>>,
}

impl ConnectionTracker {
    /// Creates a tracker with no connections.
    #[must_use]
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            count: Arc::new(count),
        }
    }

    /// Registers a connection.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.count.send_modify(|count| *count += 1);
        ConnectionToken {
            count: Arc::clone(&self.count),
        }
    }

    /// Returns the number of open connections.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        *self.count.borrow()
    }

    /// Completes once every token has been dropped.
    pub async fn wait_idle(&self) {
        let mut receiver = self.count.subscribe();
        let _ = receiver.wait_for(|count| *count == 0).await;
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered connection. Dropping it decrements the tracker.
#[derive(Debug)]
pub struct ConnectionToken {
    count: Arc<watch::Sender<usize>>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        self.count.send_modify(|count| *count = count.saturating_sub(1));
    }
}
