/// Trait for shutdown signaling
pub trait ShutdownSignal: Clone + Send + 'static {
    fn is_cancelled(&self) -> bool;
}

/// Signal that never fires, for dispatches without external cancellation
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancelled;

impl ShutdownSignal for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}
