use async_trait::async_trait;

/// Trait for pushing results toward the consumer
#[async_trait]
pub trait ResultSink<R>: Send {
    /// Push one result
    /// Returns false if the consumer is gone and the worker should stop
    async fn send(&self, result: R) -> bool;
}
