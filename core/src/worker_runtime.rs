/// Trait for abstracting how workers execute (tasks, threads)
pub trait WorkerRuntime: Send + 'static {
    type Handle: Send;
    type Error: std::fmt::Display + Send;

    /// Spawn a worker onto the runtime
    fn spawn<F, Fut>(f: F) -> Self::Handle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static;

    /// Wait for the worker to exit
    /// Returns Err if the worker terminated abnormally
    fn join(
        handle: Self::Handle,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;
}
