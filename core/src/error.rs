use std::fmt;

/// Usage errors caught while configuring a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// A dispatch needs at least one worker
    ZeroWorkers,
    /// Channel capacity must be at least 1
    ZeroCapacity,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::ZeroWorkers => write!(f, "worker count must be at least 1"),
            DispatchError::ZeroCapacity => write!(f, "channel capacity must be at least 1"),
        }
    }
}

impl std::error::Error for DispatchError {}
