//! Message-passing boundary between the application and the interceptor.
//!
//! The host environment sends one [`FetchEvent`] per outbound request and
//! awaits the reply on its oneshot channel. Each event is handled in its own
//! task so a slow request never blocks the others.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::interceptor::FetchInterceptor;
use super::request::{Request, Response};

/// Default request channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// One intercepted request and where to send its response.
#[derive(Debug)]
pub struct FetchEvent {
    pub request: Request,
    pub respond_to: oneshot::Sender<Response>,
}

/// Errors seen by a [`FetchHandle`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchHostError {
    /// The host loop has stopped.
    #[error("Fetch host is not running")]
    Closed,
}

/// Cloneable sender side of the boundary.
#[derive(Debug, Clone)]
pub struct FetchHandle {
    tx: mpsc::Sender<FetchEvent>,
}

impl FetchHandle {
    /// Sends a request and waits for its response.
    pub async fn fetch(&self, request: Request) -> Result<Response, FetchHostError> {
        let (respond_to, rx) = oneshot::channel();
        self.tx
            .send(FetchEvent {
                request,
                respond_to,
            })
            .await
            .map_err(|_| FetchHostError::Closed)?;
        rx.await.map_err(|_| FetchHostError::Closed)
    }
}

/// Running host loop.
pub struct FetchHost {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl FetchHost {
    /// Starts the loop and returns it with a handle for sending requests.
    pub fn spawn(interceptor: Arc<FetchInterceptor>, capacity: usize) -> (Self, FetchHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(Self::run(interceptor, rx, shutdown.clone()));

        (Self { shutdown, task }, FetchHandle { tx })
    }

    async fn run(
        interceptor: Arc<FetchInterceptor>,
        mut rx: mpsc::Receiver<FetchEvent>,
        shutdown: CancellationToken,
    ) {
        info!("Fetch host started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Fetch host shutting down");
                    break;
                }

                event = rx.recv() => {
                    let Some(event) = event else {
                        debug!("All fetch handles dropped");
                        break;
                    };
                    let interceptor = Arc::clone(&interceptor);
                    tokio::spawn(async move {
                        let response = interceptor.handle(event.request).await;
                        // Requester may have given up
                        let _ = event.respond_to.send(response);
                    });
                }
            }
        }

        info!("Fetch host stopped");
    }

    /// Stops accepting requests and waits for the loop to exit. Requests
    /// already dispatched still complete.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        let _ = self.task.await;
    }
}
