use async_trait::async_trait;

/// Trait for pulling work items off a shared input source
/// Different implementations for channels, sockets, etc.
#[async_trait]
pub trait WorkSource<T>: Send {
    /// Receive the next work item
    /// Returns None once the source is exhausted
    async fn next(&mut self) -> Option<T>;
}
