mod channel_wrappers;
pub use channel_wrappers::{ChannelResultSink, SharedWorkSource};

mod dispatcher;
pub use dispatcher::{DispatchStream, Dispatcher};

mod runtime;
pub use runtime::TokioRuntime;

mod shutdown;
pub use shutdown::TokenShutdownSignal;
