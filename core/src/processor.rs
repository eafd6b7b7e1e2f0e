/// Turns one work item into one result.
///
/// One processor instance is shared by every worker of a dispatch, so
/// implementations must be `Sync` and keep no per-item state. A failed
/// item is reported through `Err`; panicking instead aborts the worker
/// that was processing the item.
pub trait Processor<T>: Send + Sync + 'static {
    type Output: Send + 'static;
    type Error: Send + 'static;

    fn process(&self, item: T) -> Result<Self::Output, Self::Error>;
}

impl<F, T, R, E> Processor<T> for F
where
    F: Fn(T) -> Result<R, E> + Send + Sync + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    type Output = R;
    type Error = E;

    fn process(&self, item: T) -> Result<R, E> {
        (self)(item)
    }
}
