//! Runs store work off the async runtime and stops it once nobody is waiting.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::Error;

/// A flag shared between a request and the blocking work it started.
///
/// Long row scans check the flag between rows and give up with
/// [Error::Cancelled] once it is set.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    /// A flag that is never set by anyone but the caller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the work holding this flag to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [Cancellation::cancel] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Return [Error::Cancelled] if the flag is set.
    ///
    /// # Errors
    /// Returns [Error::Cancelled] once [Cancellation::cancel] has been called.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Cancels the wrapped flag when dropped.
struct CancelOnDrop(Cancellation);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Run `work` on the blocking thread pool.
///
/// Store calls lock a synchronous connection, so they must not run on an
/// async worker thread. If the returned future is dropped before `work`
/// finishes, e.g. by the request timeout, `work`'s [Cancellation] is set.
///
/// # Errors
/// Returns the error from `work`, or [Error::TaskFailed] if `work` panicked.
pub async fn run_blocking<T, F>(work: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&Cancellation) -> Result<T, Error> + Send + 'static,
{
    let cancellation = Cancellation::new();
    let _guard = CancelOnDrop(cancellation.clone());

    tokio::task::spawn_blocking(move || work(&cancellation))
        .await
        .map_err(|error| {
            tracing::error!("blocking store task failed: {error}");
            Error::TaskFailed
        })?
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{CancelOnDrop, Cancellation, run_blocking};

    #[test]
    fn dropping_guard_cancels() {
        let cancellation = Cancellation::new();

        drop(CancelOnDrop(cancellation.clone()));

        assert!(cancellation.is_cancelled());
        assert_eq!(cancellation.check(), Err(Error::Cancelled));
    }

    #[tokio::test]
    async fn returns_result_of_work() {
        let got = run_blocking(|cancellation| {
            cancellation.check()?;
            Ok(42)
        })
        .await;

        assert_eq!(got, Ok(42));
    }

    #[tokio::test]
    async fn panicking_work_is_task_failure() {
        let got: Result<(), Error> = run_blocking(|_| panic!("boom")).await;

        assert_eq!(got, Err(Error::TaskFailed));
    }

    #[tokio::test]
    async fn dropped_future_cancels_running_work() {
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (done_tx, done_rx) = std::sync::mpsc::channel();

        let future = run_blocking(move |cancellation| {
            started_tx.send(()).unwrap();
            while !cancellation.is_cancelled() {
                std::thread::yield_now();
            }
            done_tx.send(()).unwrap();
            Ok(())
        });
        let handle = tokio::spawn(future);
        tokio::task::spawn_blocking(move || started_rx.recv().unwrap())
            .await
            .unwrap();

        handle.abort();

        let finished = tokio::task::spawn_blocking(move || {
            done_rx.recv_timeout(std::time::Duration::from_secs(5))
        })
        .await
        .unwrap();
        assert!(finished.is_ok(), "work was not cancelled");
    }
}
