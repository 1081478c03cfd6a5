//! Cancellable handles for outstanding asynchronous operations.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use maybe_sync::MaybeSend;
use tokio::task::JoinHandle;

/// Token shared between an [`AsyncRequest`] and the operation it tracks.
///
/// The operation must check [`Liveness::is_live`] before committing its
/// result. Once the owning handle is cancelled or dropped the token is
/// revoked, so a job that already ran to completion can still be prevented
/// from invoking its completion stage.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Returns `false` once the owning handle was cancelled or dropped.
    pub fn is_live(&self) -> bool {
        !self.0.load(Ordering::SeqCst)
    }

    fn revoke(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Cancellable token of one outstanding asynchronous operation.
///
/// The handle is owned exclusively by the issuer of the operation. Cancelling
/// it, or just dropping it, guarantees that the operation's completion stage
/// never runs afterwards: the spawned task is aborted at its next suspension
/// point, and a task past its last suspension point finds its [`Liveness`]
/// token revoked.
#[derive(Debug)]
pub struct AsyncRequest {
    liveness: Liveness,
    task: JoinHandle<()>,
}

impl AsyncRequest {
    /// Spawns the future produced by `f` and returns a handle to it.
    ///
    /// The future receives the [`Liveness`] token of the new handle and must
    /// check it after every suspension point before touching shared state or
    /// invoking callbacks.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Liveness) -> Fut,
        Fut: Future<Output = ()> + MaybeSend + 'static,
    {
        let liveness = Liveness::new();
        let task = crate::async_runtime::spawn(f(liveness.clone()));
        Self { liveness, task }
    }

    /// Cancels the operation.
    ///
    /// Idempotent, and safe to call after the operation completed.
    pub fn cancel(&self) {
        self.liveness.revoke();
        self.task.abort();
    }
}

impl Drop for AsyncRequest {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn completion_runs_while_handle_is_live() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let request = AsyncRequest::spawn(move |liveness| async move {
            if liveness.is_live() {
                let _ = tx.send(());
            }
        });

        tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("completion did not run")
            .expect("completion was dropped");
        drop(request);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancel_suppresses_completion() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let request = AsyncRequest::spawn(move |liveness| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            if liveness.is_live() {
                let _ = tx.send(());
            }
        });

        request.cancel();
        request.cancel();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drop_cancels_the_operation() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let request = AsyncRequest::spawn(move |liveness| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            if liveness.is_live() {
                let _ = tx.send(());
            }
        });

        drop(request);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }
}
