//! Lifecycle orchestration with bounded graceful drain.
//!
//! Serving stops in three steps once the shutdown future resolves:
//!
//! 1. the listener stops accepting connections,
//! 2. in-flight requests get up to the grace period to finish,
//! 3. the caller releases the pools.
//!
//! When the grace period runs out the abandon token is cancelled, which
//! fails every store and cache call still running under a request context,
//! and [`BookshelfError::ShutdownTimeout`] is returned.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use bookshelf_core::{BookshelfError, BookshelfResult};
use std::future::{Future, IntoFuture};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Serves a router until shutdown and drains it within a grace period.
pub struct Lifecycle {
    grace: Duration,
    abandon: CancellationToken,
    tracker: TaskTracker,
}

impl Lifecycle {
    /// Creates an orchestrator that allows in-flight requests `grace` to
    /// finish after the shutdown signal.
    #[must_use]
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            abandon: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Token cancelled when the grace period is exceeded. Request contexts
    /// are created as its children.
    #[must_use]
    pub fn abandon_token(&self) -> CancellationToken {
        self.abandon.clone()
    }

    /// Handle on the in-flight request tracker.
    #[must_use]
    pub fn tracker(&self) -> TaskTracker {
        self.tracker.clone()
    }

    /// Number of requests currently being handled.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wraps `router` so every request is counted while it runs.
    pub fn track(&self, router: Router) -> Router {
        router.layer(middleware::from_fn_with_state(
            self.tracker.clone(),
            track_in_flight,
        ))
    }

    /// Serves `router` on `listener` until `shutdown` resolves, then drains.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        router: Router,
        shutdown: F,
    ) -> BookshelfResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let stop_accepting = CancellationToken::new();
        let stop = stop_accepting.clone();
        let server = axum::serve(listener, self.track(router))
            .with_graceful_shutdown(async move { stop.cancelled().await })
            .into_future();
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => {
                return result.map_err(|e| BookshelfError::Internal(format!("Server error: {}", e)));
            }
            () = shutdown => {}
        }

        info!(
            in_flight = self.tracker.len(),
            grace_secs = self.grace.as_secs(),
            "Shutdown signal received, no longer accepting connections"
        );
        stop_accepting.cancel();

        match tokio::time::timeout(self.grace, &mut server).await {
            Ok(result) => {
                result.map_err(|e| BookshelfError::Internal(format!("Server error: {}", e)))?;
                self.tracker.close();
                info!("All in-flight requests drained");
                Ok(())
            }
            Err(_) => {
                let remaining = self.tracker.len();
                self.abandon.cancel();
                self.tracker.close();
                error!(
                    in_flight = remaining,
                    "Graceful drain exceeded {:?}, abandoning in-flight requests", self.grace
                );
                Err(BookshelfError::ShutdownTimeout(self.grace))
            }
        }
    }
}

async fn track_in_flight(
    State(tracker): State<TaskTracker>,
    request: Request,
    next: Next,
) -> Response {
    let _token = tracker.token();
    next.run(request).await
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
