use fanout_core::WorkerRuntime;
use tokio::task::JoinHandle;

/// Runs workers as tokio tasks
pub struct TokioRuntime;

impl WorkerRuntime for TokioRuntime {
    type Handle = JoinHandle<()>;
    type Error = tokio::task::JoinError;

    fn spawn<F, Fut>(f: F) -> Self::Handle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(f())
    }

    async fn join(handle: Self::Handle) -> Result<(), Self::Error> {
        handle.await
    }
}
