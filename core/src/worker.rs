use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{ItemOutcome, Processor, ResultSink, ShutdownSignal, WorkSource};

/// A unit of concurrent execution that can be spawned onto a
/// [`WorkerRuntime`](crate::WorkerRuntime)
#[async_trait]
pub trait Worker: Send + 'static {
    /// Drive the worker until its input is exhausted or it is told to stop
    async fn run(self);
}

/// The standard pull-process-push worker.
///
/// Repeatedly takes a sequence-tagged item from the shared source,
/// processes it, and pushes the outcome to the sink. Within one worker,
/// outcomes leave in the same order the items were pulled. The worker
/// exits when the source is exhausted, the consumer goes away, or the
/// shutdown signal fires. Dropping the worker releases its sink clone,
/// which is what lets the result stream close.
pub struct PoolWorker<T, P, S, K, SD> {
    id: usize,
    processor: Arc<P>,
    source: S,
    sink: K,
    shutdown: SD,
    _item: PhantomData<fn(T)>,
}

impl<T, P, S, K, SD> PoolWorker<T, P, S, K, SD> {
    pub fn new(id: usize, processor: Arc<P>, source: S, sink: K, shutdown: SD) -> Self {
        Self {
            id,
            processor,
            source,
            sink,
            shutdown,
            _item: PhantomData,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

#[async_trait]
impl<T, P, S, K, SD> Worker for PoolWorker<T, P, S, K, SD>
where
    T: Send + 'static,
    P: Processor<T>,
    S: WorkSource<(u64, T)> + 'static,
    K: ResultSink<ItemOutcome<P::Output, P::Error>> + 'static,
    SD: ShutdownSignal,
{
    async fn run(mut self) {
        debug!(worker = self.id, "worker started");

        loop {
            if self.shutdown.is_cancelled() {
                debug!(worker = self.id, "worker cancelled");
                break;
            }

            let Some((seq, item)) = self.source.next().await else {
                break;
            };

            let outcome = match self.processor.process(item) {
                Ok(value) => ItemOutcome::ok(seq, value),
                Err(error) => {
                    debug!(worker = self.id, seq, "item failed, forwarding outcome");
                    ItemOutcome::failed(seq, error)
                }
            };

            if !self.sink.send(outcome).await {
                debug!(worker = self.id, "consumer gone, worker stopping");
                break;
            }
        }

        debug!(worker = self.id, "worker finished");
    }
}
