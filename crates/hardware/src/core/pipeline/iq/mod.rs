//! Instruction queue: the dispatch/wakeup/select core of the backend.
//!
//! Holds decoded, renamed, in-flight instructions until they complete,
//! tracks their register and memory dependencies, wakes consumers when
//! producers finish, and each cycle selects the oldest ready instructions
//! for the available function units. The queue also owns execution-latency
//! timing: a scheduled instruction becomes a completed one here, via
//! function-unit completion events, which permits back-to-back scheduling
//! of dependent instructions without the execute stage peeking inside.
//!
//! Structure overview:
//! 1. **Dependency graph + scoreboard:** Who waits on which physical register.
//! 2. **Instruction windows:** Per-thread dispatch-ordered lists of everything in flight.
//! 3. **Ready queues + age-order list:** Oldest-first selection across op classes.
//! 4. **Non-speculative map:** Instructions held until commit releases them.
//! 5. **Completion events:** FU latency timing feeding back into wakeup.
//! 6. **Squash engine:** Tail-first removal of misspeculated instructions.
//! 7. **SMT admission:** Per-thread entry caps under three sharing policies.

pub mod dep_graph;
pub mod queues;

use crate::common::types::{Cycle, OpClass, SeqNum, ThreadId, MAX_THREADS};
use crate::config::{Config, IqPolicy};
use crate::core::inst::DynInstRef;
use crate::core::pipeline::fu_pool::{FuPool, FuRequest};
use crate::core::pipeline::latches::{IssueStruct, TimeStruct};
use crate::core::pipeline::mem_dep::{DepPredictor, MemDepUnit};
use crate::core::pipeline::time_buffer::TimeBuffer;
use crate::stats::IqStats;
use dep_graph::DependGraph;
use log::{debug, trace};
use queues::{AgeOrderList, ReadyQueue};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

/// A pending function-unit completion: at `fire_at`, the instruction's
/// result becomes visible, its consumers wake, and the unit (if any) goes
/// back to the pool.
#[derive(Debug)]
struct FuCompletion {
    fire_at: Cycle,
    /// Schedule order, to keep same-cycle completions stable.
    order: u64,
    inst: DynInstRef,
    fu_idx: Option<usize>,
}

impl PartialEq for FuCompletion {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.order == other.order
    }
}

impl Eq for FuCompletion {}

impl PartialOrd for FuCompletion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FuCompletion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: earliest event on top of the max-heap.
        (other.fire_at, other.order).cmp(&(self.fire_at, self.order))
    }
}

/// The instruction queue of one simulated CPU.
pub struct InstructionQueue {
    num_threads: usize,
    num_entries: usize,
    total_width: usize,
    num_phys_regs: usize,
    squash_width: usize,
    policy: IqPolicy,
    threshold: usize,

    fu_pool: FuPool,
    mem_dep: Vec<MemDepUnit>,

    /// Per-thread window of everything in flight, dispatch order
    /// (front = oldest, back = youngest).
    inst_list: Vec<VecDeque<DynInstRef>>,
    ready_insts: [ReadyQueue; OpClass::COUNT],
    list_order: AgeOrderList,
    non_spec_insts: BTreeMap<SeqNum, DynInstRef>,
    depend_graph: DependGraph,
    /// One bit per physical register: true once the producer has delivered,
    /// so later consumers need no graph entry.
    reg_scoreboard: Vec<bool>,

    events: BinaryHeap<FuCompletion>,
    event_order: u64,

    count: [usize; MAX_THREADS],
    max_entries: [usize; MAX_THREADS],
    free_entries: usize,
    active_threads: Vec<ThreadId>,

    squashed_seq_num: [SeqNum; MAX_THREADS],
    squash_in_progress: [bool; MAX_THREADS],

    now: Cycle,
    /// Counters; reset-free, read out at end of simulation.
    pub stats: IqStats,
}

impl InstructionQueue {
    /// Builds an IQ (and its FU pool and per-thread memory dependence
    /// units) from configuration.
    pub fn new(config: &Config) -> Self {
        assert!(
            config.num_threads >= 1 && config.num_threads <= MAX_THREADS,
            "num_threads {} outside 1..={}",
            config.num_threads,
            MAX_THREADS
        );
        let mut iq = Self {
            num_threads: config.num_threads,
            num_entries: config.iq.num_entries,
            total_width: config.iq.issue_width,
            num_phys_regs: config.num_phys_regs(),
            squash_width: config.iq.squash_width,
            policy: config.iq.policy,
            threshold: config.iq.threshold,
            fu_pool: FuPool::new(&config.fu_pool),
            mem_dep: (0..config.num_threads).map(|_| MemDepUnit::new()).collect(),
            inst_list: (0..config.num_threads).map(|_| VecDeque::new()).collect(),
            ready_insts: Default::default(),
            list_order: AgeOrderList::new(),
            non_spec_insts: BTreeMap::new(),
            depend_graph: DependGraph::new(config.num_phys_regs()),
            reg_scoreboard: vec![false; config.num_phys_regs()],
            events: BinaryHeap::new(),
            event_order: 0,
            count: [0; MAX_THREADS],
            max_entries: [0; MAX_THREADS],
            free_entries: config.iq.num_entries,
            active_threads: (0..config.num_threads).collect(),
            squashed_seq_num: [0; MAX_THREADS],
            squash_in_progress: [false; MAX_THREADS],
            now: 0,
            stats: IqStats::default(),
        };
        iq.reset_entries();
        iq
    }

    /// Replaces thread `tid`'s memory-dependence predictor. Intended for
    /// tests and experiments.
    pub fn set_dep_predictor(&mut self, tid: ThreadId, predictor: Box<dyn DepPredictor>) {
        self.mem_dep[tid] = MemDepUnit::with_predictor(predictor);
    }

    // ────────────────────────────────────────────────────────────
    // SMT admission
    // ────────────────────────────────────────────────────────────

    /// Per-thread entry share for `num_active` threads under the
    /// Partitioned policy.
    pub fn entry_amount(&self, num_active: usize) -> usize {
        self.num_entries / num_active.max(1)
    }

    /// Informs the queue of the active-thread set; recomputes per-thread
    /// caps.
    pub fn set_active_threads(&mut self, threads: Vec<ThreadId>) {
        self.active_threads = threads;
        self.reset_entries();
    }

    /// Recomputes per-thread entry caps from the sharing policy.
    pub fn reset_entries(&mut self) {
        let active = self.active_threads.len().max(1);
        for &tid in &self.active_threads {
            self.max_entries[tid] = match self.policy {
                IqPolicy::Dynamic => self.num_entries,
                IqPolicy::Partitioned => self.num_entries / active,
                IqPolicy::Threshold => self.threshold,
            };
        }
    }

    /// Total free entries.
    pub fn num_free_entries(&self) -> usize {
        self.free_entries
    }

    /// Free entries visible to one thread under its cap.
    pub fn num_free_entries_for(&self, tid: ThreadId) -> usize {
        self.max_entries[tid].saturating_sub(self.count[tid])
    }

    /// Whether the queue as a whole is out of entries.
    pub fn is_full(&self) -> bool {
        self.free_entries == 0
    }

    /// Whether thread `tid` may not insert another instruction.
    pub fn is_full_for(&self, tid: ThreadId) -> bool {
        match self.policy {
            IqPolicy::Dynamic => self.free_entries == 0,
            IqPolicy::Partitioned => self.count[tid] >= self.max_entries[tid],
            IqPolicy::Threshold => {
                self.count[tid] >= self.max_entries[tid] || self.free_entries == 0
            }
        }
    }

    /// Entries in use by thread `tid`.
    pub fn get_count(&self, tid: ThreadId) -> usize {
        self.count[tid]
    }

    /// Whether any ready queue is non-empty. Squashed leftovers awaiting
    /// lazy removal may make this conservatively true.
    pub fn has_ready_insts(&self) -> bool {
        !self.list_order.is_empty()
    }

    /// Whether a width-bounded squash of `tid` is still in progress.
    /// Dispatch must not insert into a thread that is mid-squash.
    pub fn is_squashing(&self, tid: ThreadId) -> bool {
        self.squash_in_progress[tid]
    }

    /// Borrow of the FU pool (shared with the issue/execute stage).
    pub fn fu_pool(&self) -> &FuPool {
        &self.fu_pool
    }

    fn claim_entry(&mut self, tid: ThreadId) {
        assert!(
            !self.is_full_for(tid),
            "instruction queue capacity violation on thread {}",
            tid
        );
        self.free_entries -= 1;
        self.count[tid] += 1;
    }

    // ────────────────────────────────────────────────────────────
    // Insertion
    // ────────────────────────────────────────────────────────────

    /// Inserts a speculative instruction for scheduling. The caller must
    /// have checked [`is_full_for`](Self::is_full_for).
    pub fn insert(&mut self, inst: DynInstRef) {
        debug_assert!(!inst.is_non_spec(), "use insert_non_spec");
        self.claim_entry(inst.tid);
        self.inst_list[inst.tid].push_back(inst.clone());

        self.create_dependency(&inst);
        self.add_to_dependents(&inst);
        if inst.mem_ref {
            self.mem_dep[inst.tid].insert(inst.clone());
        }
        self.add_if_ready(&inst);

        self.stats.insts_added += 1;
        trace!("iq: inserted {}", inst);
    }

    /// Inserts a non-speculative instruction. It will not issue until
    /// commit calls [`schedule_non_spec`](Self::schedule_non_spec).
    pub fn insert_non_spec(&mut self, inst: DynInstRef) {
        self.book_non_spec(&inst);
        if inst.mem_ref {
            self.mem_dep[inst.tid].insert(inst.clone());
        }
    }

    /// Inserts a memory/write barrier: non-speculative, and registered with
    /// the memory dependence unit so younger accesses order behind it.
    pub fn insert_barrier(&mut self, inst: DynInstRef) {
        debug_assert!(inst.barrier);
        self.book_non_spec(&inst);
        self.mem_dep[inst.tid].insert_barrier(inst.clone());
    }

    fn book_non_spec(&mut self, inst: &DynInstRef) {
        debug_assert!(inst.is_non_spec());
        self.claim_entry(inst.tid);
        self.inst_list[inst.tid].push_back(inst.clone());

        // Commit releases it only once it is the oldest in flight, so its
        // source values are architecturally ready; no consumer edges needed.
        let prior = self.non_spec_insts.insert(inst.seq_num, inst.clone());
        assert!(prior.is_none(), "duplicate non-spec seq {}", inst.seq_num);
        self.add_to_dependents(inst);

        self.stats.insts_added += 1;
        self.stats.non_spec_insts_added += 1;
        trace!("iq: inserted non-spec {}", inst);
    }

    /// Books window and SMT accounting for an instruction that will never
    /// be scheduled here (e.g. a no-op consumed at rename).
    pub fn advance_tail(&mut self, inst: DynInstRef) {
        self.claim_entry(inst.tid);
        self.inst_list[inst.tid].push_back(inst);
    }

    // ────────────────────────────────────────────────────────────
    // Dependency graph
    // ────────────────────────────────────────────────────────────

    /// Registers `inst` as a consumer of each unready source register.
    fn create_dependency(&mut self, inst: &DynInstRef) {
        if inst.num_srcs() == 0 {
            inst.set_can_issue(true);
            return;
        }
        for idx in 0..inst.num_srcs() {
            let reg = inst.srcs[idx].reg;
            assert!(reg < self.num_phys_regs, "source register {} out of range", reg);
            if self.reg_scoreboard[reg] {
                inst.mark_src_ready(idx);
            } else {
                let slot = self.depend_graph.insert(reg, inst.clone(), idx);
                inst.srcs[idx].set_dep_slot(Some(slot));
            }
        }
    }

    /// Publishes `inst` as the producer of its destination registers.
    fn add_to_dependents(&mut self, inst: &DynInstRef) {
        for &reg in &inst.dests {
            assert!(reg < self.num_phys_regs, "dest register {} out of range", reg);
            self.reg_scoreboard[reg] = false;
        }
    }

    /// Wakes all consumers of a completed instruction's results. Returns
    /// how many consumer operands were satisfied.
    pub fn wake_dependents(&mut self, completed: &DynInstRef) -> usize {
        let mut woken = 0;
        for di in 0..completed.dests.len() {
            let reg = completed.dests[di];
            self.reg_scoreboard[reg] = true;
            while let Some((consumer, src_idx)) = self.depend_graph.pop_front(reg) {
                debug_assert!(
                    !consumer.is_squashed(),
                    "squashed consumer left in dependency graph"
                );
                woken += 1;
                if consumer.mark_src_ready(src_idx) {
                    self.add_if_ready(&consumer);
                }
            }
        }
        trace!("iq: {} woke {} operand(s)", completed, woken);
        woken
    }

    /// Routes a fully register-ready instruction toward selection: memory
    /// references go through their dependence unit, everything else enters
    /// its ready queue directly.
    fn add_if_ready(&mut self, inst: &DynInstRef) {
        if !inst.can_issue() || inst.is_issued() || inst.is_non_spec() {
            return;
        }
        if inst.mem_ref {
            self.mem_dep[inst.tid].regs_ready(inst);
        } else {
            self.push_ready(inst.clone());
        }
    }

    fn push_ready(&mut self, inst: DynInstRef) {
        let class = inst.op_class;
        let ci = class.index();
        let seq = inst.seq_num;
        let old_head = self.ready_insts[ci].peek().map(|top| top.seq_num);
        trace!("iq: {} ready ({})", inst, class);
        self.ready_insts[ci].push(inst);
        match old_head {
            None => self.list_order.add(class, seq),
            Some(head) if seq < head => self.list_order.reposition(class, seq),
            Some(_) => {}
        }
    }

    // ────────────────────────────────────────────────────────────
    // Per-cycle tick
    // ────────────────────────────────────────────────────────────

    /// Runs one cycle: consume commit signals, fire due completion events,
    /// then select up to the issue width of ready instructions. Issued and
    /// completed instructions land in `i2e`'s slot for the cycle their
    /// function-unit time expires.
    pub fn tick(
        &mut self,
        now: Cycle,
        from_commit: &TimeStruct,
        i2e: &mut TimeBuffer<IssueStruct>,
    ) {
        self.now = now;
        self.stats.cycles += 1;
        self.fu_pool.advance_cycle();

        for tid in 0..self.num_threads {
            let signal = &from_commit.commit_info[tid];
            if signal.squash {
                self.squash(tid, signal.squashed_seq_num);
            } else if self.squash_in_progress[tid] {
                // Resume a squash bounded by squash_width in earlier cycles.
                self.do_squash(tid);
            }
            if let Some(sn) = signal.non_spec_seq_num {
                self.schedule_non_spec(sn);
            }
            if let Some(sn) = signal.commit_seq_num {
                self.commit(sn, tid);
            }
        }

        self.process_fu_completions(now, i2e);
        self.schedule_ready_insts(i2e);

        debug_assert_eq!(
            self.count_insts(),
            self.num_entries - self.free_entries,
            "window population disagrees with SMT accounting"
        );
    }

    /// Fires every completion event due at or before `now`.
    fn process_fu_completions(&mut self, now: Cycle, i2e: &mut TimeBuffer<IssueStruct>) {
        while let Some(head) = self.events.peek() {
            if head.fire_at > now {
                break;
            }
            let event = self.events.pop().expect("peeked event vanished");
            if let Some(idx) = event.fu_idx {
                self.fu_pool.free_unit(idx);
            }
            // A squashed instruction's event only returns the unit.
            if event.inst.is_squashed() {
                continue;
            }
            event.inst.set_executed();
            i2e.write(0).insts.push(event.inst.clone());
            self.wake_dependents(&event.inst);
        }
    }

    /// Selects ready instructions oldest-first across op classes, up to the
    /// issue width, honoring per-class FU availability.
    fn schedule_ready_insts(&mut self, i2e: &mut TimeBuffer<IssueStruct>) {
        for tid in 0..self.num_threads {
            for inst in self.mem_dep[tid].take_ready() {
                self.add_ready_mem_inst(inst);
            }
        }

        let mut total_issued = 0;
        while total_issued < self.total_width {
            // Restart from the head of the age order after every dispatch so
            // the bundle is the globally oldest set that fits the units.
            if !self.select_one(i2e) {
                break;
            }
            total_issued += 1;
        }
        self.stats.issued_per_cycle.record(total_issued as u64);
    }

    /// One walk of the age-order list; issues the oldest instruction whose
    /// op class has a unit to spare. Returns false when nothing could go.
    fn select_one(&mut self, i2e: &mut TimeBuffer<IssueStruct>) -> bool {
        self.scrub_squashed_heads();

        let classes: Vec<OpClass> = self.list_order.iter().map(|e| e.op_class).collect();
        for class in classes {
            let ci = class.index();
            debug_assert!(!self.ready_insts[ci].is_empty());
            match self.fu_pool.get_unit(class) {
                FuRequest::Busy => {
                    self.stats.fu_busy[ci] += 1;
                    continue;
                }
                FuRequest::NoCapability => {
                    self.issue_head(class, None, i2e);
                    return true;
                }
                FuRequest::Granted(idx) => {
                    self.issue_head(class, Some(idx), i2e);
                    return true;
                }
            }
        }
        false
    }

    /// Pops lazily squashed instructions off every ready-queue head and
    /// fixes up the age-order list to match.
    fn scrub_squashed_heads(&mut self) {
        let classes: Vec<OpClass> = self.list_order.iter().map(|e| e.op_class).collect();
        for class in classes {
            let ci = class.index();
            let mut popped = false;
            while let Some(top) = self.ready_insts[ci].peek() {
                if !top.is_squashed() {
                    break;
                }
                self.ready_insts[ci].pop();
                self.stats.squashed_insts_issued += 1;
                popped = true;
            }
            if popped {
                match self.ready_insts[ci].peek().map(|top| top.seq_num) {
                    Some(seq) => self.list_order.reposition(class, seq),
                    None => self.list_order.remove(class),
                }
            }
        }
        debug_assert!(self.list_order.is_sorted());
    }

    /// Issues the head of `class`'s ready queue on `fu_idx` (None when no
    /// unit serves the class and the instruction goes with default timing).
    fn issue_head(&mut self, class: OpClass, fu_idx: Option<usize>, i2e: &mut TimeBuffer<IssueStruct>) {
        let ci = class.index();
        let inst = self.ready_insts[ci].pop().expect("issuing from empty queue");
        debug_assert!(inst.can_issue() && !inst.is_issued() && !inst.is_squashed());

        match self.ready_insts[ci].peek().map(|top| top.seq_num) {
            Some(seq) => self.list_order.reposition(class, seq),
            None => self.list_order.remove(class),
        }

        inst.set_issued(true);
        inst.set_issue_cycle(self.now);
        self.stats.insts_issued += 1;
        self.stats.insts_issued_per_class[ci] += 1;
        self.stats
            .issue_delay
            .record(self.now.saturating_sub(inst.dispatch_cycle()));
        if inst.mem_ref {
            self.mem_dep[inst.tid].issue(&inst);
        }

        // Pipelined units take new work next cycle regardless of latency;
        // unpipelined units ride along with the completion event.
        let carried = match fu_idx {
            Some(idx) if self.fu_pool.is_pipelined(class) => {
                self.fu_pool.release_next_cycle(idx);
                None
            }
            other => other,
        };

        let latency = self.fu_pool.get_latency(class);
        debug!("iq: issued {} ({}) latency {}", inst, class, latency);
        if latency == 0 {
            // Result is visible in the issue cycle: dependents can be
            // selected back-to-back in this same tick.
            if let Some(idx) = carried {
                self.fu_pool.free_unit(idx);
            }
            inst.set_executed();
            i2e.write(0).insts.push(inst.clone());
            self.wake_dependents(&inst);
        } else {
            self.event_order += 1;
            self.events.push(FuCompletion {
                fire_at: self.now + latency,
                order: self.event_order,
                inst,
                fu_idx: carried,
            });
        }
    }

    // ────────────────────────────────────────────────────────────
    // Memory instructions
    // ────────────────────────────────────────────────────────────

    /// A memory instruction is both register- and memory-ready; place it in
    /// its ready queue.
    pub fn add_ready_mem_inst(&mut self, inst: DynInstRef) {
        debug_assert!(inst.mem_ref);
        if inst.is_squashed() || inst.is_issued() || !inst.can_issue() {
            return;
        }
        self.push_ready(inst);
    }

    /// Pulls an issued memory instruction back for later replay (e.g. it
    /// was deferred behind a predicted-dependent store). Idempotent.
    pub fn reschedule_mem_inst(&mut self, inst: &DynInstRef) {
        inst.set_issued(false);
        self.mem_dep[inst.tid].reschedule(inst);
    }

    /// Re-admits a rescheduled memory instruction to selection.
    pub fn replay_mem_inst(&mut self, inst: &DynInstRef) {
        self.mem_dep[inst.tid].replay(inst);
    }

    /// A memory instruction's access finished; releases ordering on
    /// anything waiting behind it.
    pub fn complete_mem_inst(&mut self, inst: &DynInstRef) {
        inst.set_completed();
        self.mem_dep[inst.tid].completed(inst);
    }

    /// Store→load ordering violation: forwarded to the offending thread's
    /// dependence predictor. Recovery belongs to commit, not to the IQ.
    pub fn violation(&mut self, store: &DynInstRef, faulting_load: &DynInstRef) {
        self.mem_dep[faulting_load.tid].violation(store, faulting_load);
    }

    // ────────────────────────────────────────────────────────────
    // Non-speculative release and commit
    // ────────────────────────────────────────────────────────────

    /// Commit says the non-speculative instruction at `seq_num` is safe to
    /// execute.
    ///
    /// # Panics
    ///
    /// Unknown sequence numbers are fatal: they mean commit and the IQ
    /// disagree about what is in flight.
    pub fn schedule_non_spec(&mut self, seq_num: SeqNum) {
        let inst = self
            .non_spec_insts
            .remove(&seq_num)
            .unwrap_or_else(|| panic!("non-spec release for unknown seq {}", seq_num));
        debug!("iq: non-spec {} released", inst);
        inst.clear_non_spec();
        inst.set_can_issue(true);
        self.add_if_ready(&inst);
    }

    /// Removes every instruction of thread `tid` with sequence number at or
    /// below `seq_num` from the window, freeing their entries.
    pub fn commit(&mut self, seq_num: SeqNum, tid: ThreadId) {
        while let Some(head) = self.inst_list[tid].front() {
            if head.seq_num > seq_num {
                break;
            }
            let inst = self.inst_list[tid].pop_front().expect("window head vanished");
            debug_assert!(
                !self.non_spec_insts.contains_key(&inst.seq_num),
                "committing unreleased non-spec {}",
                inst
            );
            self.free_entries += 1;
            self.count[tid] -= 1;
            self.stats
                .queue_residency
                .record(self.now.saturating_sub(inst.dispatch_cycle()));
            trace!("iq: committed {}", inst);
        }
    }

    // ────────────────────────────────────────────────────────────
    // Squash
    // ────────────────────────────────────────────────────────────

    /// Begins (or re-aims) a squash of thread `tid`: every instruction
    /// younger than `squashed_seq_num` will be dropped, possibly spread
    /// over several cycles when a squash width is configured.
    pub fn squash(&mut self, tid: ThreadId, squashed_seq_num: SeqNum) {
        debug!(
            "iq: squash thread {} younger than sn {}",
            tid, squashed_seq_num
        );
        self.squashed_seq_num[tid] = squashed_seq_num;
        self.squash_in_progress[tid] = true;
        self.mem_dep[tid].squash(squashed_seq_num);
        self.do_squash(tid);
    }

    /// Walks the window tail-first, dropping squashed instructions up to
    /// the per-cycle squash width. The walk resumes next tick if bounded.
    fn do_squash(&mut self, tid: ThreadId) {
        let limit = if self.squash_width == 0 {
            usize::MAX
        } else {
            self.squash_width
        };
        let mut removed = 0;
        while removed < limit {
            let Some(back) = self.inst_list[tid].back() else {
                break;
            };
            if back.seq_num <= self.squashed_seq_num[tid] {
                break;
            }
            let inst = self.inst_list[tid].pop_back().expect("window tail vanished");
            self.squash_inst(&inst, tid);
            removed += 1;
        }

        let finished = self.inst_list[tid]
            .back()
            .map_or(true, |back| back.seq_num <= self.squashed_seq_num[tid]);
        if finished {
            self.squash_in_progress[tid] = false;
        }
    }

    fn squash_inst(&mut self, inst: &DynInstRef, tid: ThreadId) {
        self.stats.squashed_insts_examined += 1;

        if self.non_spec_insts.remove(&inst.seq_num).is_some() {
            self.stats.squashed_non_spec_removed += 1;
        }

        if !inst.is_issued() {
            for idx in 0..inst.num_srcs() {
                self.stats.squashed_operands_examined += 1;
                let src = &inst.srcs[idx];
                if let Some(slot) = src.dep_slot() {
                    self.depend_graph.remove(src.reg, slot);
                    src.set_dep_slot(None);
                }
            }
            // If it sits in a ready queue it stays there; select skips
            // squashed entries when they surface (lazy removal).
        }

        inst.set_squashed();
        inst.set_can_issue(false);
        self.free_entries += 1;
        self.count[tid] -= 1;
        trace!("iq: squashed {}", inst);
    }

    // ────────────────────────────────────────────────────────────
    // Debug introspection
    // ────────────────────────────────────────────────────────────

    /// Counts instructions across all thread windows by walking them.
    /// Debug cross-check only; linear in window population.
    pub fn count_insts(&self) -> usize {
        self.inst_list.iter().map(|l| l.len()).sum()
    }

    /// Logs the population of every list the queue maintains.
    pub fn dump_lists(&self) {
        debug!(
            "iq: free {} / {}, age-order {} classes, non-spec {}, graph {} edges",
            self.free_entries,
            self.num_entries,
            self.list_order.len(),
            self.non_spec_insts.len(),
            self.depend_graph.num_entries()
        );
        for class in OpClass::ALL {
            let queue = &self.ready_insts[class.index()];
            if !queue.is_empty() {
                debug!("iq:   ready[{}] holds {}", class, queue.len());
            }
        }
    }

    /// Logs every instruction currently in a window.
    pub fn dump_insts(&self) {
        for (tid, window) in self.inst_list.iter().enumerate() {
            for inst in window {
                debug!("iq: t{} {:?}", tid, inst);
            }
        }
    }
}
