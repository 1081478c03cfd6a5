//! Dispatch of CPU-bound jobs to background worker threads.

use std::sync::atomic::{AtomicUsize, Ordering};

use maybe_sync::MaybeSend;

use crate::async_request::AsyncRequest;

/// Handle to the pool of background execution contexts used for decode work.
///
/// Jobs run on the blocking thread pool of the tokio runtime. The returned
/// [`AsyncRequest`] guarantees the completion function never runs after the
/// handle is cancelled or dropped; the job itself is not interrupted and may
/// finish its CPU work, its result is then discarded.
#[derive(Debug, Clone, Default)]
pub struct Workers {}

impl Workers {
    /// Creates a new dispatcher.
    pub fn new() -> Self {
        Self {}
    }

    /// Submits `job` for background execution and returns a cancellable
    /// handle.
    ///
    /// `on_complete` is invoked with the job's output on an unspecified
    /// thread, unless the handle was cancelled first.
    pub fn submit<T, J, C>(&self, job: J, on_complete: C) -> AsyncRequest
    where
        T: MaybeSend + 'static,
        J: FnOnce() -> T + MaybeSend + 'static,
        C: FnOnce(T) + MaybeSend + 'static,
    {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        AsyncRequest::spawn(move |liveness| async move {
            let result = tokio::task::spawn_blocking(move || {
                log::debug!(
                    "Added worker: {}",
                    COUNTER.fetch_add(1, Ordering::Relaxed) + 1
                );
                let result = job();
                log::debug!(
                    "Finished worker: {}",
                    COUNTER.fetch_sub(1, Ordering::Relaxed) - 1
                );
                result
            })
            .await;

            if !liveness.is_live() {
                log::trace!("Discarding result of a cancelled worker job");
                return;
            }

            match result {
                Ok(value) => on_complete(value),
                Err(error) => log::error!("Worker job panicked: {error}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn job_result_reaches_completion() {
        let workers = Workers::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        let _request = workers.submit(
            || 2 + 2,
            move |value| {
                let _ = tx.send(value);
            },
        );

        let value = tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("completion did not run")
            .expect("completion was dropped");
        assert_eq!(value, 4);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancelled_job_never_completes() {
        let workers = Workers::new();
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();

        let request = workers.submit(
            move || {
                // Hold the job mid-flight until the test releases it.
                let _ = gate_rx.recv();
                42
            },
            move |value| {
                let _ = done_tx.send(value);
            },
        );

        request.cancel();
        // The job may not even have started if the abort won the race; either
        // way no completion must be observed.
        let _ = gate_tx.send(());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(done_rx.try_recv().is_err());
    }
}
