//! Fluent builders for in-flight instructions.

use o3sim_core::common::types::{OpClass, PhysRegId, SeqNum, ThreadId};
use o3sim_core::core::{DynInst, DynInstRef};

/// Builder for [`DynInstRef`] handles with sensible defaults: thread 0,
/// `IntAlu`, no operands.
pub struct InstBuilder {
    seq: SeqNum,
    tid: ThreadId,
    op: OpClass,
    pc: u64,
    srcs: Vec<PhysRegId>,
    dests: Vec<PhysRegId>,
    non_spec: bool,
    barrier: bool,
}

impl InstBuilder {
    /// Starts a builder for sequence number `seq`.
    pub fn new(seq: SeqNum) -> Self {
        Self {
            seq,
            tid: 0,
            op: OpClass::IntAlu,
            pc: 0,
            srcs: vec![],
            dests: vec![],
            non_spec: false,
            barrier: false,
        }
    }

    pub fn thread(mut self, tid: ThreadId) -> Self {
        self.tid = tid;
        self
    }

    pub fn op(mut self, op: OpClass) -> Self {
        self.op = op;
        self
    }

    pub fn pc(mut self, pc: u64) -> Self {
        self.pc = pc;
        self
    }

    pub fn srcs(mut self, srcs: &[PhysRegId]) -> Self {
        self.srcs = srcs.to_vec();
        self
    }

    pub fn dests(mut self, dests: &[PhysRegId]) -> Self {
        self.dests = dests.to_vec();
        self
    }

    pub fn non_spec(mut self) -> Self {
        self.non_spec = true;
        self
    }

    pub fn barrier(mut self) -> Self {
        self.barrier = true;
        self
    }

    /// Builds the shared handle.
    pub fn build(self) -> DynInstRef {
        if self.barrier {
            DynInst::new_barrier(self.seq, self.tid)
        } else if self.non_spec {
            DynInst::new_non_spec(self.seq, self.tid, self.op, self.srcs, self.dests)
        } else {
            DynInst::new_at(self.seq, self.tid, self.op, self.pc, self.srcs, self.dests)
        }
    }
}
