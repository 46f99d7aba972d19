//! Cancellable requests.
//!
//! A [`CancellableRequest`] wraps a future together with a oneshot channel.
//! Calling [`CancelHandle::cancel`] or dropping the handle makes the request
//! resolve to [`Cancelled`] instead of its value, so a late result can never
//! be applied after teardown.

use std::future::Future;

use tokio::sync::oneshot;

use super::error::Cancelled;

/// Cancels the paired [`CancellableRequest`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: oneshot::Sender<()>,
}

impl CancelHandle {
    pub fn cancel(self) {
        let _ = self.tx.send(());
    }
}

/// A future that can be cancelled through its [`CancelHandle`].
#[derive(Debug)]
pub struct CancellableRequest<F> {
    inner: F,
    cancelled: oneshot::Receiver<()>,
}

impl<F: Future> CancellableRequest<F> {
    /// Wraps `inner`, returning the request and its cancel handle.
    pub fn new(inner: F) -> (Self, CancelHandle) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                inner,
                cancelled: rx,
            },
            CancelHandle { tx },
        )
    }

    /// Runs the request to completion unless it is cancelled first.
    pub async fn run(self) -> Result<F::Output, Cancelled> {
        let Self { inner, cancelled } = self;

        tokio::select! {
            biased;

            // Both an explicit cancel and a dropped handle land here.
            _ = cancelled => Err(Cancelled),
            output = inner => Ok(output),
        }
    }
}
