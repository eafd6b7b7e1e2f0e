use std::sync::Arc;

use async_trait::async_trait;
use fanout_core::{ItemOutcome, ResultSink, WorkSource};
use tokio::sync::{mpsc, Mutex};

/// Work source shared by every worker of a dispatch: one mpsc receiver
/// behind an async mutex. The critical section is a single `recv`, so
/// items are handed out first-come first-served and a worker blocked on
/// an empty source parks inside the channel, not on the lock.
pub struct SharedWorkSource<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> SharedWorkSource<T> {
    pub fn new(rx: mpsc::Receiver<T>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }
}

impl<T> Clone for SharedWorkSource<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

#[async_trait]
impl<T: Send> WorkSource<T> for SharedWorkSource<T> {
    async fn next(&mut self) -> Option<T> {
        self.rx.lock().await.recv().await
    }
}

/// Result sink backed by the dispatch's output channel.
///
/// Each worker owns one clone; the output channel closes when the last
/// clone is dropped, which is what terminates the consumer's stream.
pub struct ChannelResultSink<R, E> {
    tx: mpsc::Sender<ItemOutcome<R, E>>,
}

impl<R, E> ChannelResultSink<R, E> {
    pub fn new(tx: mpsc::Sender<ItemOutcome<R, E>>) -> Self {
        Self { tx }
    }
}

impl<R, E> Clone for ChannelResultSink<R, E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

#[async_trait]
impl<R: Send, E: Send> ResultSink<ItemOutcome<R, E>> for ChannelResultSink<R, E> {
    async fn send(&self, result: ItemOutcome<R, E>) -> bool {
        self.tx.send(result).await.is_ok()
    }
}
