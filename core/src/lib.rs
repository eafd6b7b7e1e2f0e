mod coordinator;
pub use coordinator::{CompletionReport, Coordinator};

mod error;
pub use error::DispatchError;

mod item_outcome;
pub use item_outcome::ItemOutcome;

mod processor;
pub use processor::Processor;

mod result_sink;
pub use result_sink::ResultSink;

mod shutdown_signal;
pub use shutdown_signal::{NeverCancelled, ShutdownSignal};

mod work_source;
pub use work_source::WorkSource;

mod worker;
pub use worker::{PoolWorker, Worker};

mod worker_runtime;
pub use worker_runtime::WorkerRuntime;
