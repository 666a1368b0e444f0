//! Memory dependence unit.
//!
//! Register readiness is necessary but not sufficient for memory
//! instructions: a load or store must also be *memory-ready* — no older
//! barrier outstanding, and (for loads a predictor flags as dependent) no
//! older incomplete store. One unit exists per thread; the IQ routes memory
//! instructions through it and drains the instructions it declares ready at
//! select time.
//!
//! The unit owns no timing of its own. It watches inserts, issues,
//! completions, and squashes, and it trains its predictor on store→load
//! ordering violations reported from the load/store queue.

use crate::common::types::SeqNum;
use crate::core::inst::DynInstRef;
use log::{debug, trace};
use std::collections::{BTreeMap, HashSet};

/// Predicts whether a load must wait for older stores before issuing.
///
/// The unit consults the predictor once, when the load is inserted, and
/// trains it when an ordering violation is reported.
pub trait DepPredictor {
    /// Whether `load` should be held until all older stores complete.
    fn check_dependency(&mut self, load: &DynInstRef) -> bool;

    /// Records that `load` issued past `store` on the same address and was
    /// caught.
    fn train_violation(&mut self, store: &DynInstRef, load: &DynInstRef);
}

/// Default predictor: a load that has violated once is predicted dependent
/// forever after, keyed by its PC.
#[derive(Debug, Default)]
pub struct ViolationHistory {
    pcs: HashSet<u64>,
}

impl DepPredictor for ViolationHistory {
    fn check_dependency(&mut self, load: &DynInstRef) -> bool {
        self.pcs.contains(&load.pc)
    }

    fn train_violation(&mut self, store: &DynInstRef, load: &DynInstRef) {
        debug!(
            "memdep: violation store {} load {}, remembering pc {:#x}",
            store, load, load.pc
        );
        self.pcs.insert(load.pc);
    }
}

#[derive(Debug)]
struct TrackedInst {
    inst: DynInstRef,
    regs_ready: bool,
    mem_ready: bool,
    /// Consulted once at insert; true means wait for all older stores.
    must_wait_stores: bool,
    /// Set after the instruction was handed to the ready drain, cleared by
    /// a reschedule so a replay can hand it over again.
    notified: bool,
    /// A reschedule parked this instruction; only a replay revives it.
    awaiting_replay: bool,
}

/// Per-thread memory dependence tracking.
pub struct MemDepUnit {
    entries: BTreeMap<SeqNum, TrackedInst>,
    ready: Vec<DynInstRef>,
    predictor: Box<dyn DepPredictor>,
}

impl std::fmt::Debug for MemDepUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemDepUnit")
            .field("tracked", &self.entries.len())
            .field("ready", &self.ready.len())
            .finish()
    }
}

impl MemDepUnit {
    /// Creates a unit with the default violation-history predictor.
    pub fn new() -> Self {
        Self::with_predictor(Box::new(ViolationHistory::default()))
    }

    /// Creates a unit with a caller-supplied predictor.
    pub fn with_predictor(predictor: Box<dyn DepPredictor>) -> Self {
        Self {
            entries: BTreeMap::new(),
            ready: Vec::new(),
            predictor,
        }
    }

    /// Number of memory instructions currently tracked.
    pub fn num_tracked(&self) -> usize {
        self.entries.len()
    }

    /// Starts tracking a dispatched load or store.
    pub fn insert(&mut self, inst: DynInstRef) {
        let must_wait_stores = inst.op_class.is_load() && self.predictor.check_dependency(&inst);
        let seq = inst.seq_num;
        let mut tracked = TrackedInst {
            inst,
            regs_ready: false,
            mem_ready: false,
            must_wait_stores,
            notified: false,
            awaiting_replay: false,
        };
        tracked.mem_ready = self.blocker_for(seq, &tracked).is_none();
        trace!(
            "memdep: track {} mem_ready={} wait_stores={}",
            tracked.inst,
            tracked.mem_ready,
            must_wait_stores
        );
        self.entries.insert(seq, tracked);
    }

    /// Starts tracking a barrier. Younger memory instructions stay
    /// memory-unready until the barrier completes.
    pub fn insert_barrier(&mut self, inst: DynInstRef) {
        debug_assert!(inst.barrier);
        debug!("memdep: barrier {} outstanding", inst);
        self.insert(inst);
    }

    /// The IQ reports that `inst`'s register operands are all satisfied.
    pub fn regs_ready(&mut self, inst: &DynInstRef) {
        let Some(entry) = self.entries.get_mut(&inst.seq_num) else {
            panic!("memdep: regs_ready for untracked {}", inst);
        };
        entry.regs_ready = true;
        Self::promote(&mut self.ready, entry);
    }

    /// Notes that the instruction was selected and sent to a function unit.
    pub fn issue(&mut self, inst: &DynInstRef) {
        trace!("memdep: issued {}", inst);
    }

    /// Parks an issued memory instruction for replay (e.g. the cache
    /// deferred it). Idempotent: a second reschedule is a no-op.
    pub fn reschedule(&mut self, inst: &DynInstRef) {
        let Some(entry) = self.entries.get_mut(&inst.seq_num) else {
            panic!("memdep: reschedule for untracked {}", inst);
        };
        if entry.awaiting_replay {
            return;
        }
        entry.awaiting_replay = true;
        entry.notified = false;
        debug!("memdep: parked {} for replay", inst);
    }

    /// Revives a previously rescheduled instruction.
    pub fn replay(&mut self, inst: &DynInstRef) {
        let Some(entry) = self.entries.get_mut(&inst.seq_num) else {
            panic!("memdep: replay for untracked {}", inst);
        };
        if !entry.awaiting_replay {
            return;
        }
        entry.awaiting_replay = false;
        Self::promote(&mut self.ready, entry);
    }

    /// A tracked instruction finished its memory access. Dropping it may
    /// unblock younger loads (store completed) or everything younger
    /// (barrier completed).
    pub fn completed(&mut self, inst: &DynInstRef) {
        let removed = self.entries.remove(&inst.seq_num);
        debug_assert!(removed.is_some(), "memdep: completing untracked {}", inst);
        self.refresh_ready();
    }

    /// Ordering-violation report: train the predictor. State rollback is
    /// commit's job, not ours.
    pub fn violation(&mut self, store: &DynInstRef, load: &DynInstRef) {
        self.predictor.train_violation(store, load);
    }

    /// Drops every tracked instruction younger than `squashed_seq_num`.
    pub fn squash(&mut self, squashed_seq_num: SeqNum) {
        let doomed: Vec<SeqNum> = self
            .entries
            .range(squashed_seq_num + 1..)
            .map(|(&sn, _)| sn)
            .collect();
        for sn in &doomed {
            self.entries.remove(sn);
        }
        self.ready.retain(|i| i.seq_num <= squashed_seq_num);
        if !doomed.is_empty() {
            debug!(
                "memdep: squashed {} tracked insts above sn {}",
                doomed.len(),
                squashed_seq_num
            );
            self.refresh_ready();
        }
    }

    /// Hands over the instructions that became both register- and
    /// memory-ready since the last drain.
    pub fn take_ready(&mut self) -> Vec<DynInstRef> {
        std::mem::take(&mut self.ready)
    }

    /// Youngest tracked instruction older than `seq` that blocks it, if any.
    fn blocker_for(&self, seq: SeqNum, tracked: &TrackedInst) -> Option<SeqNum> {
        for (&older_sn, older) in self.entries.range(..seq).rev() {
            if older.inst.barrier {
                return Some(older_sn);
            }
            if tracked.inst.barrier {
                // A barrier waits for every older memory access to drain.
                return Some(older_sn);
            }
            if tracked.must_wait_stores && older.inst.op_class.is_store() {
                return Some(older_sn);
            }
        }
        None
    }

    /// Recomputes memory readiness after the tracked set shrank.
    fn refresh_ready(&mut self) {
        let candidates: Vec<SeqNum> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.mem_ready)
            .map(|(&sn, _)| sn)
            .collect();
        for sn in candidates {
            let entry = &self.entries[&sn];
            if self.blocker_for(sn, entry).is_none() {
                let entry = self.entries.get_mut(&sn).expect("entry vanished");
                entry.mem_ready = true;
                Self::promote(&mut self.ready, entry);
            }
        }
    }

    /// Pushes an instruction onto the ready drain once both gates open.
    fn promote(ready: &mut Vec<DynInstRef>, entry: &mut TrackedInst) {
        if entry.regs_ready
            && entry.mem_ready
            && !entry.awaiting_replay
            && !entry.notified
            && !entry.inst.is_squashed()
        {
            entry.notified = true;
            trace!("memdep: {} is memory-ready", entry.inst);
            ready.push(entry.inst.clone());
        }
    }
}

impl Default for MemDepUnit {
    fn default() -> Self {
        Self::new()
    }
}
