use std::sync::Arc;

use fanout_core::{Coordinator, DispatchError, ItemOutcome, PoolWorker, Processor};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::channel_wrappers::{ChannelResultSink, SharedWorkSource};
use crate::runtime::TokioRuntime;
use crate::shutdown::TokenShutdownSignal;

/// Front end of the fan-out/fan-in pattern over tokio channels.
///
/// `dispatch` fans a sequence of items out to a fixed number of worker
/// tasks and hands back a single-consumer stream of sequence-tagged
/// outcomes. The stream ends exactly once, only after every worker has
/// exited. Arrival order across workers is unspecified; a single worker
/// preserves the order of the items it consumed.
///
/// The consumer should drain the stream to its end. Dropping it early is
/// safe: workers observe the closed output channel and stop instead of
/// blocking forever.
pub struct Dispatcher {
    coordinator: Coordinator<TokioRuntime>,
    capacity: usize,
    shutdown: CancellationToken,
}

impl Dispatcher {
    /// Create a dispatcher with `worker_count` workers and channel
    /// capacity equal to the worker count.
    pub fn new(worker_count: usize) -> Result<Self, DispatchError> {
        Ok(Self {
            coordinator: Coordinator::new(worker_count)?,
            capacity: worker_count,
            shutdown: CancellationToken::new(),
        })
    }

    /// Override the input/output channel capacity.
    ///
    /// tokio channels have a minimum capacity of 1; capacity 1 is the
    /// closest available approximation of a synchronous handoff.
    pub fn with_capacity(mut self, capacity: usize) -> Result<Self, DispatchError> {
        if capacity == 0 {
            return Err(DispatchError::ZeroCapacity);
        }
        self.capacity = capacity;
        Ok(self)
    }

    pub fn worker_count(&self) -> usize {
        self.coordinator.worker_count()
    }

    /// Token for stopping a dispatch early. Workers stop between items,
    /// the feeder stops submitting, and the result stream still
    /// terminates cleanly with whatever was produced.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Fan the items of a sequence out to the workers.
    ///
    /// The sequence may be unbounded; submission is paced by channel
    /// capacity, and an unbounded sequence keeps the dispatch running
    /// until the token is cancelled or the consumer goes away.
    pub fn dispatch<I, T, P>(&self, items: I, processor: P) -> DispatchStream<P::Output, P::Error>
    where
        I: IntoIterator<Item = T> + Send + 'static,
        I::IntoIter: Send + 'static,
        T: Send + 'static,
        P: Processor<T>,
    {
        let (work_tx, work_rx) = mpsc::channel(self.capacity);
        let feeder_token = self.shutdown.clone();

        tokio::spawn(async move {
            let mut submitted = 0u64;
            for item in items {
                tokio::select! {
                    _ = feeder_token.cancelled() => {
                        debug!(submitted, "input feed cancelled");
                        return;
                    }
                    sent = work_tx.send((submitted, item)) => {
                        if sent.is_err() {
                            debug!(submitted, "workers gone, input feed stopping");
                            return;
                        }
                    }
                }
                submitted += 1;
            }
            debug!(submitted, "input exhausted");
        });

        self.spawn_workers(work_rx, processor)
    }

    /// Fan out items arriving on an already-open channel.
    ///
    /// The producer keeps backpressure by holding the sender side;
    /// dropping the sender marks the input exhausted.
    pub fn dispatch_channel<T, P>(
        &self,
        mut input: mpsc::Receiver<T>,
        processor: P,
    ) -> DispatchStream<P::Output, P::Error>
    where
        T: Send + 'static,
        P: Processor<T>,
    {
        // Retag the incoming items with intake sequence numbers.
        let (work_tx, work_rx) = mpsc::channel(self.capacity);
        let feeder_token = self.shutdown.clone();

        tokio::spawn(async move {
            let mut submitted = 0u64;
            loop {
                tokio::select! {
                    _ = feeder_token.cancelled() => {
                        debug!(submitted, "input feed cancelled");
                        return;
                    }
                    next = input.recv() => match next {
                        Some(item) => {
                            if work_tx.send((submitted, item)).await.is_err() {
                                debug!(submitted, "workers gone, input feed stopping");
                                return;
                            }
                            submitted += 1;
                        }
                        None => break,
                    }
                }
            }
            debug!(submitted, "input exhausted");
        });

        self.spawn_workers(work_rx, processor)
    }

    fn spawn_workers<T, P>(
        &self,
        work_rx: mpsc::Receiver<(u64, T)>,
        processor: P,
    ) -> DispatchStream<P::Output, P::Error>
    where
        T: Send + 'static,
        P: Processor<T>,
    {
        let (out_tx, out_rx) = mpsc::channel(self.capacity);
        let source = SharedWorkSource::new(work_rx);
        let sink = ChannelResultSink::new(out_tx);
        let processor = Arc::new(processor);
        let shutdown = TokenShutdownSignal::new(self.shutdown.clone());
        let coordinator = self.coordinator;

        tokio::spawn(async move {
            let report = coordinator
                .run(move |id| {
                    PoolWorker::new(
                        id,
                        Arc::clone(&processor),
                        source.clone(),
                        sink.clone(),
                        shutdown.clone(),
                    )
                })
                .await;
            debug!(
                completed = report.completed,
                aborted = report.aborted,
                "dispatch finished"
            );
        });

        DispatchStream { rx: out_rx }
    }
}

/// Single-consumer stream of outcomes from one dispatch.
///
/// `recv` returns `None` exactly when the input is exhausted (or the
/// dispatch was cancelled) and every worker has exited; once `None` has
/// been observed, further calls keep returning `None`.
pub struct DispatchStream<R, E> {
    rx: mpsc::Receiver<ItemOutcome<R, E>>,
}

impl<R, E> DispatchStream<R, E> {
    /// Receive the next outcome, or `None` at end-of-stream
    pub async fn recv(&mut self) -> Option<ItemOutcome<R, E>> {
        self.rx.recv().await
    }

    /// Adapt to a `Stream` for use with stream combinators
    pub fn into_stream(self) -> ReceiverStream<ItemOutcome<R, E>> {
        ReceiverStream::new(self.rx)
    }
}
