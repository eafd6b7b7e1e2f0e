/// Outcome of processing one work item, tagged with the sequence number
/// the item was assigned at intake.
///
/// Failed items are forwarded to the consumer as data rather than aborting
/// the dispatch, so every submitted item is accounted for exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome<R, E> {
    /// Intake position of the item, starting at 0
    pub seq: u64,
    /// The processing result for this item
    pub outcome: Result<R, E>,
}

impl<R, E> ItemOutcome<R, E> {
    pub fn ok(seq: u64, value: R) -> Self {
        Self {
            seq,
            outcome: Ok(value),
        }
    }

    pub fn failed(seq: u64, error: E) -> Self {
        Self {
            seq,
            outcome: Err(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn into_result(self) -> Result<R, E> {
        self.outcome
    }
}
