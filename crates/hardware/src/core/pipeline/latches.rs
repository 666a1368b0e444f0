//! Payload types carried through the pipeline's time buffers.
//!
//! Two wires matter to the instruction queue: the backwards wire from
//! commit (squash / commit / non-speculative release signals, one lane per
//! thread) and the forwards issue-to-execute queue (the bundle of
//! instructions whose function-unit time expires in a given cycle).

use crate::common::types::{SeqNum, MAX_THREADS};
use crate::core::inst::DynInstRef;

/// Per-thread signal lane from commit to the IQ.
#[derive(Debug, Clone, Default)]
pub struct CommitSignal {
    /// A misspeculation was detected; squash everything younger than
    /// `squashed_seq_num`.
    pub squash: bool,
    /// Youngest surviving sequence number for this thread's squash.
    pub squashed_seq_num: SeqNum,
    /// All instructions at or below this sequence number have committed.
    pub commit_seq_num: Option<SeqNum>,
    /// A non-speculative instruction commit has released for execution.
    pub non_spec_seq_num: Option<SeqNum>,
}

/// The backwards time-buffer payload: one [`CommitSignal`] lane per thread.
#[derive(Debug, Clone, Default)]
pub struct TimeStruct {
    /// Commit-to-IQ signal lanes, indexed by thread id.
    pub commit_info: [CommitSignal; MAX_THREADS],
}

/// The forwards issue-to-execute payload: instructions whose execution
/// completes in the slot's cycle, in issue order.
#[derive(Debug, Clone, Default)]
pub struct IssueStruct {
    /// Completed-this-cycle instruction bundle.
    pub insts: Vec<DynInstRef>,
}

impl IssueStruct {
    /// Number of instructions in the bundle.
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    /// Whether the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }
}
