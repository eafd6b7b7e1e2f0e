use std::marker::PhantomData;

use tracing::{debug, error};

use crate::{DispatchError, Worker, WorkerRuntime};

/// How a finished dispatch ended, as seen by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionReport {
    /// Workers that ran their input to exhaustion or stopped cleanly
    pub completed: usize,
    /// Workers that terminated abnormally (panicking processor)
    pub aborted: usize,
}

/// Coordinator fans work out to a fixed set of workers and confirms every
/// one of them has exited before the result stream is allowed to close.
///
/// Closing the stream is not an explicit operation: each worker owns a
/// clone of the result sink, and the stream ends when the last clone is
/// dropped. Signaling completion twice is therefore impossible by
/// construction.
pub struct Coordinator<RT: WorkerRuntime> {
    worker_count: usize,
    _runtime: PhantomData<RT>,
}

impl<RT: WorkerRuntime> Clone for Coordinator<RT> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<RT: WorkerRuntime> Copy for Coordinator<RT> {}

impl<RT: WorkerRuntime> Coordinator<RT> {
    pub fn new(worker_count: usize) -> Result<Self, DispatchError> {
        if worker_count == 0 {
            return Err(DispatchError::ZeroWorkers);
        }
        Ok(Self {
            worker_count,
            _runtime: PhantomData,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Launch all workers and wait for each of them to exit.
    ///
    /// A worker that terminates abnormally is logged and counted; the
    /// remaining workers keep draining the input, so the dispatch still
    /// runs to completion.
    pub async fn run<W>(&self, mut make_worker: impl FnMut(usize) -> W + Send) -> CompletionReport
    where
        W: Worker,
    {
        let mut handles = Vec::with_capacity(self.worker_count);
        for id in 0..self.worker_count {
            let worker = make_worker(id);
            handles.push(RT::spawn(move || worker.run()));
        }
        // Release the factory's captures; from here on only the workers
        // themselves hold result sinks.
        drop(make_worker);
        debug!(workers = self.worker_count, "all workers launched");

        let mut report = CompletionReport::default();
        for (id, handle) in handles.into_iter().enumerate() {
            match RT::join(handle).await {
                Ok(()) => report.completed += 1,
                Err(e) => {
                    error!(worker = id, "worker terminated abnormally: {}", e);
                    report.aborted += 1;
                }
            }
        }

        debug!(
            completed = report.completed,
            aborted = report.aborted,
            "all workers exited"
        );
        report
    }
}
