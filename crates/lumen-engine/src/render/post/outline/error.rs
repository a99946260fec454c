/// Errors raised by slot edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutlineError {
    #[error("outline slot {slot} is out of range (slot count {slot_count})")]
    SlotOutOfRange { slot: usize, slot_count: usize },

    #[error("outline slot {slot} holds at most {max} entities, got {len}")]
    CapacityExceeded { slot: usize, len: usize, max: usize },
}
