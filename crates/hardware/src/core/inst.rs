//! In-flight dynamic instruction handle.
//!
//! A [`DynInst`] is created at dispatch and shared by reference between the
//! instruction queue, the memory dependence unit, and the surrounding
//! pipeline harness. The simulator is single-threaded, so the handle is an
//! `Rc` and per-instruction status lives in `Cell`s: stages flip flags on a
//! shared instruction without taking ownership of it.

use crate::common::types::{Cycle, OpClass, PhysRegId, SeqNum, ThreadId};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to an in-flight instruction.
pub type DynInstRef = Rc<DynInst>;

/// One source operand: the physical register it reads, whether that value
/// is available yet, and (while waiting) where this instruction's consumer
/// entry lives in the dependency graph arena.
#[derive(Debug)]
pub struct SrcReg {
    /// Physical register this operand reads.
    pub reg: PhysRegId,
    ready: Cell<bool>,
    dep_slot: Cell<Option<u32>>,
}

impl SrcReg {
    /// New, not-yet-satisfied source operand.
    pub fn new(reg: PhysRegId) -> Self {
        Self {
            reg,
            ready: Cell::new(false),
            dep_slot: Cell::new(None),
        }
    }

    /// Whether the producing instruction has delivered this value.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Arena slot of this operand's entry in the dependency graph, if it is
    /// currently linked there.
    #[inline]
    pub fn dep_slot(&self) -> Option<u32> {
        self.dep_slot.get()
    }

    pub(crate) fn set_dep_slot(&self, slot: Option<u32>) {
        self.dep_slot.set(slot);
    }
}

/// A decoded, renamed, in-flight instruction.
///
/// Identity (sequence number, thread, op class, operands) is fixed at
/// construction; lifecycle status is interior-mutable. The queue does not
/// own the instruction's lifetime — it drops its references at commit or
/// squash and the last holder frees it.
pub struct DynInst {
    /// Global dispatch-order sequence number; smaller is older.
    pub seq_num: SeqNum,
    /// Hardware thread this instruction belongs to.
    pub tid: ThreadId,
    /// Function-unit category.
    pub op_class: OpClass,
    /// Program counter, carried for logging and predictor training.
    pub pc: u64,
    /// Source operands.
    pub srcs: Vec<SrcReg>,
    /// Destination physical registers.
    pub dests: Vec<PhysRegId>,
    /// Whether this instruction reads or writes memory.
    pub mem_ref: bool,
    /// Whether this is a memory/write barrier.
    pub barrier: bool,

    non_spec: Cell<bool>,
    ready_srcs: Cell<usize>,
    can_issue: Cell<bool>,
    issued: Cell<bool>,
    executed: Cell<bool>,
    completed: Cell<bool>,
    squashed: Cell<bool>,
    dispatch_cycle: Cell<Cycle>,
    issue_cycle: Cell<Cycle>,
}

impl DynInst {
    /// Creates a speculative instruction handle.
    pub fn new(
        seq_num: SeqNum,
        tid: ThreadId,
        op_class: OpClass,
        srcs: Vec<PhysRegId>,
        dests: Vec<PhysRegId>,
    ) -> DynInstRef {
        Self::build(seq_num, tid, op_class, srcs, dests, 0, false, false)
    }

    /// Creates a speculative instruction handle carrying a program counter,
    /// used by the memory-dependence predictor to recognize repeat
    /// offenders.
    pub fn new_at(
        seq_num: SeqNum,
        tid: ThreadId,
        op_class: OpClass,
        pc: u64,
        srcs: Vec<PhysRegId>,
        dests: Vec<PhysRegId>,
    ) -> DynInstRef {
        Self::build(seq_num, tid, op_class, srcs, dests, pc, false, false)
    }

    /// Creates a non-speculative instruction handle: it may not issue until
    /// commit releases it.
    pub fn new_non_spec(
        seq_num: SeqNum,
        tid: ThreadId,
        op_class: OpClass,
        srcs: Vec<PhysRegId>,
        dests: Vec<PhysRegId>,
    ) -> DynInstRef {
        Self::build(seq_num, tid, op_class, srcs, dests, 0, true, false)
    }

    /// Creates a memory/write barrier handle. Barriers are always
    /// non-speculative.
    pub fn new_barrier(seq_num: SeqNum, tid: ThreadId) -> DynInstRef {
        Self::build(seq_num, tid, OpClass::MemWrite, vec![], vec![], 0, true, true)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        seq_num: SeqNum,
        tid: ThreadId,
        op_class: OpClass,
        srcs: Vec<PhysRegId>,
        dests: Vec<PhysRegId>,
        pc: u64,
        non_spec: bool,
        barrier: bool,
    ) -> DynInstRef {
        Rc::new(Self {
            seq_num,
            tid,
            op_class,
            pc,
            mem_ref: op_class.is_mem_ref(),
            barrier,
            srcs: srcs.into_iter().map(SrcReg::new).collect(),
            dests,
            non_spec: Cell::new(non_spec),
            ready_srcs: Cell::new(0),
            can_issue: Cell::new(false),
            issued: Cell::new(false),
            executed: Cell::new(false),
            completed: Cell::new(false),
            squashed: Cell::new(false),
            dispatch_cycle: Cell::new(0),
            issue_cycle: Cell::new(0),
        })
    }

    /// Number of source operands.
    #[inline]
    pub fn num_srcs(&self) -> usize {
        self.srcs.len()
    }

    /// Marks source operand `idx` satisfied. Returns true if that was the
    /// last outstanding source, i.e. the instruction just became issuable.
    pub fn mark_src_ready(&self, idx: usize) -> bool {
        let src = &self.srcs[idx];
        debug_assert!(!src.ready.get(), "source {} satisfied twice", idx);
        src.ready.set(true);
        src.dep_slot.set(None);
        let ready = self.ready_srcs.get() + 1;
        self.ready_srcs.set(ready);
        if ready == self.srcs.len() {
            self.can_issue.set(true);
            true
        } else {
            false
        }
    }

    /// Whether all source operands are satisfied.
    #[inline]
    pub fn can_issue(&self) -> bool {
        self.can_issue.get()
    }

    pub(crate) fn set_can_issue(&self, v: bool) {
        self.can_issue.set(v);
    }

    /// Whether this instruction has been handed to a function unit.
    #[inline]
    pub fn is_issued(&self) -> bool {
        self.issued.get()
    }

    pub(crate) fn set_issued(&self, v: bool) {
        self.issued.set(v);
    }

    /// Whether the function unit has produced this instruction's result.
    #[inline]
    pub fn is_executed(&self) -> bool {
        self.executed.get()
    }

    pub(crate) fn set_executed(&self) {
        self.executed.set(true);
    }

    /// Whether the instruction has fully completed (writeback done; memory
    /// ops additionally cleared by the memory dependence unit).
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    /// Marks the instruction completed. Called by the writeback side of the
    /// pipeline harness.
    pub fn set_completed(&self) {
        self.completed.set(true);
    }

    /// Whether a squash has invalidated this instruction.
    #[inline]
    pub fn is_squashed(&self) -> bool {
        self.squashed.get()
    }

    pub(crate) fn set_squashed(&self) {
        self.squashed.set(true);
    }

    /// Whether this instruction must wait for commit to release it.
    #[inline]
    pub fn is_non_spec(&self) -> bool {
        self.non_spec.get()
    }

    pub(crate) fn clear_non_spec(&self) {
        self.non_spec.set(false);
    }

    /// Cycle at which the instruction entered the IQ.
    #[inline]
    pub fn dispatch_cycle(&self) -> Cycle {
        self.dispatch_cycle.get()
    }

    pub(crate) fn set_dispatch_cycle(&self, c: Cycle) {
        self.dispatch_cycle.set(c);
    }

    /// Cycle at which the instruction was selected for execution.
    #[inline]
    pub fn issue_cycle(&self) -> Cycle {
        self.issue_cycle.get()
    }

    pub(crate) fn set_issue_cycle(&self, c: Cycle) {
        self.issue_cycle.set(c);
    }
}

impl fmt::Debug for DynInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynInst")
            .field("seq", &self.seq_num)
            .field("tid", &self.tid)
            .field("op", &self.op_class)
            .field("can_issue", &self.can_issue.get())
            .field("issued", &self.issued.get())
            .field("completed", &self.completed.get())
            .field("squashed", &self.squashed.get())
            .finish()
    }
}

impl fmt::Display for DynInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[sn:{} tid:{} {}]", self.seq_num, self.tid, self.op_class)
    }
}
