// src/client/handle.rs
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::ready;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::domain::errors::{ClientError, ClientResult};

/// Cancelable handle over an in-flight query.
///
/// Lifecycle: pending until the query resolves, rejects, or is canceled.
/// Canceled is terminal and mutually exclusive with the other two outcomes.
/// Dropping the handle does not cancel the request; cancellation happens
/// only through [`QueryHandle::cancel`].
pub struct QueryHandle<T> {
    join: JoinHandle<ClientResult<T>>,
    cancel: Arc<Notify>,
}

impl<T: Send + 'static> QueryHandle<T> {
    /// Run `fut` on the current runtime, racing it against cancellation.
    pub(crate) fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let cancel = Arc::new(Notify::new());
        let canceled = cancel.clone();

        let join = tokio::spawn(async move {
            tokio::select! {
                // Cancel arm first: a cancellation that raced the response
                // still settles as canceled.
                biased;
                _ = canceled.notified() => Err(ClientError::Canceled),
                outcome = fut => outcome,
            }
        });

        Self { join, cancel }
    }
}

impl<T> QueryHandle<T> {
    /// Request cancellation.
    ///
    /// Safe to call any number of times and never panics. Before the query
    /// settles, the in-flight request is dropped and the handle settles as
    /// canceled; afterwards this is a no-op and the settled outcome is
    /// unchanged.
    pub fn cancel(&self) {
        self.cancel.notify_one();
    }

    /// Whether the query has settled (resolved, rejected, or canceled).
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl<T> Future for QueryHandle<T> {
    type Output = ClientResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let outcome = ready!(Pin::new(&mut self.join).poll(cx));
        Poll::Ready(match outcome {
            Ok(settled) => settled,
            // The task vanishes without an outcome only when the runtime is
            // shutting down; surface that as cancellation.
            Err(join_err) if join_err.is_cancelled() => Err(ClientError::Canceled),
            Err(join_err) => std::panic::resume_unwind(join_err.into_panic()),
        })
    }
}
