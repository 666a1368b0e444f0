//! Simulator: dispatch/commit harness around the instruction queue.
//!
//! Owns the IQ and the two time buffers side-by-side and drives the
//! canonical per-cycle order: commit produces its signals (delayed toward
//! the IQ), dispatch inserts renamed instructions while entries last, the
//! IQ ticks (squash/commit intake, FU completions, wakeup/select), and
//! writeback marks the cycle's completed bundle.
//!
//! The harness plays the roles the IQ's neighbors would in a full CPU:
//! a per-thread in-order window stands in for the reorder buffer, and a
//! `mispredict` flag on a workload instruction stands in for branch
//! resolution — committing it squashes everything younger, modeling the
//! refetch without modeling a front end.

use crate::common::types::{Cycle, SeqNum, ThreadId, MAX_THREADS};
use crate::common::SimError;
use crate::config::Config;
use crate::core::inst::{DynInst, DynInstRef};
use crate::core::pipeline::iq::InstructionQueue;
use crate::core::pipeline::latches::{IssueStruct, TimeStruct};
use crate::core::pipeline::time_buffer::TimeBuffer;
use crate::sim::workload::{Workload, WorkloadInst};
use crate::stats::IqStats;
use log::{debug, info};
use std::collections::{HashSet, VecDeque};

/// End-of-run summary.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Cycles simulated.
    pub cycles: Cycle,
    /// Instructions committed across all threads.
    pub committed: u64,
    /// Whether the workload fully drained (false = cycle limit hit).
    pub drained: bool,
}

/// Top-level simulator: instruction queue plus the surrounding harness
/// state.
pub struct Simulator {
    config: Config,
    iq: InstructionQueue,
    /// Backwards wire, commit to IQ, delayed by `commit_to_iew_delay`.
    time_buffer: TimeBuffer<TimeStruct>,
    /// Forwards issue-to-execute queue; slot 0 is the bundle completing
    /// this cycle.
    i2e: TimeBuffer<IssueStruct>,
    /// Undispatched instruction stream, per thread.
    pending: Vec<VecDeque<WorkloadInst>>,
    /// In-order in-flight window per thread; front is the commit point.
    rob: Vec<VecDeque<DynInstRef>>,
    /// Sequence numbers whose commit triggers a squash.
    mispredicted: HashSet<SeqNum>,
    /// A mispredicted branch is in flight: fetch follows the wrong path,
    /// so only wrong-path instructions may dispatch until it resolves.
    speculating: [bool; MAX_THREADS],
    /// Dispatch is held for a thread until its squash has reached the IQ.
    dispatch_hold_until: [Cycle; MAX_THREADS],
    last_non_spec_release: [Option<SeqNum>; MAX_THREADS],
    next_seq: SeqNum,
    cycle: Cycle,
    committed: u64,
}

impl Simulator {
    /// Builds a simulator for `workload` on the machine described by
    /// `config`.
    pub fn new(config: Config, workload: Workload) -> Result<Self, SimError> {
        config.validate()?;
        workload.validate(&config)?;

        let mut pending: Vec<VecDeque<WorkloadInst>> =
            (0..config.num_threads).map(|_| VecDeque::new()).collect();
        for inst in workload.insts {
            pending[inst.thread].push_back(inst);
        }

        let delay = config.commit_to_iew_delay;
        Ok(Self {
            iq: InstructionQueue::new(&config),
            time_buffer: TimeBuffer::new(delay, delay),
            i2e: TimeBuffer::new(1, 1),
            rob: (0..config.num_threads).map(|_| VecDeque::new()).collect(),
            pending,
            mispredicted: HashSet::new(),
            speculating: [false; MAX_THREADS],
            dispatch_hold_until: [0; MAX_THREADS],
            last_non_spec_release: [None; MAX_THREADS],
            next_seq: 1,
            cycle: 0,
            committed: 0,
            config,
        })
    }

    /// Simulated cycle count so far.
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Instructions committed so far.
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// Whether every instruction has been dispatched and retired.
    pub fn done(&self) -> bool {
        self.pending.iter().all(|q| q.is_empty()) && self.rob.iter().all(|q| q.is_empty())
    }

    /// Instruction queue statistics.
    pub fn iq_stats(&self) -> &IqStats {
        &self.iq.stats
    }

    /// Read access to the instruction queue (inspection, tests).
    pub fn iq(&self) -> &InstructionQueue {
        &self.iq
    }

    /// Runs until the workload drains or `max_cycles` elapse.
    pub fn run(&mut self, max_cycles: Cycle) -> RunSummary {
        while !self.done() && self.cycle < max_cycles {
            self.tick();
        }
        // Let the final commit signals travel through the time buffer so
        // the IQ's own windows drain too.
        if self.done() {
            for _ in 0..=self.config.commit_to_iew_delay {
                if self.cycle >= max_cycles {
                    break;
                }
                self.tick();
            }
        }
        let summary = RunSummary {
            cycles: self.cycle,
            committed: self.committed,
            drained: self.done(),
        };
        info!(
            "run finished: {} cycles, {} committed, drained={}",
            summary.cycles, summary.committed, summary.drained
        );
        summary
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) {
        self.commit_stage();
        self.dispatch_stage();

        let from_commit = self.time_buffer.read(0).clone();
        self.iq.tick(self.cycle, &from_commit, &mut self.i2e);

        self.writeback_stage();

        self.time_buffer.advance();
        self.i2e.advance();
        self.cycle += 1;
    }

    /// Retires completed instructions in order per thread and emits the
    /// squash / commit / non-spec-release signals toward the IQ.
    fn commit_stage(&mut self) {
        let mut out = TimeStruct::default();

        for tid in 0..self.config.num_threads {
            let signal = &mut out.commit_info[tid];

            // Release the oldest instruction if it waits on commit. Every
            // older instruction has retired, so it is safe to execute.
            if let Some(head) = self.rob[tid].front() {
                if head.is_non_spec() && self.last_non_spec_release[tid] != Some(head.seq_num) {
                    signal.non_spec_seq_num = Some(head.seq_num);
                    self.last_non_spec_release[tid] = Some(head.seq_num);
                }
            }

            let mut committed_to = None;
            while let Some(head) = self.rob[tid].front() {
                if !head.is_completed() || head.is_squashed() {
                    break;
                }
                let inst = self.rob[tid].pop_front().expect("rob head vanished");
                committed_to = Some(inst.seq_num);
                self.committed += 1;
                debug!("commit: retired {}", inst);

                if self.mispredicted.contains(&inst.seq_num) {
                    self.start_squash(tid, inst.seq_num, signal);
                    break;
                }
            }
            signal.commit_seq_num = committed_to;
        }

        let delay = self.config.commit_to_iew_delay as isize;
        *self.time_buffer.write(delay) = out;
    }

    /// Emits the squash signal and cleans the harness-side wrong path.
    fn start_squash(
        &mut self,
        tid: ThreadId,
        squashed_seq_num: SeqNum,
        signal: &mut crate::core::pipeline::latches::CommitSignal,
    ) {
        debug!(
            "commit: thread {} redirect at sn {}, squashing younger",
            tid, squashed_seq_num
        );
        signal.squash = true;
        signal.squashed_seq_num = squashed_seq_num;

        while self
            .rob[tid]
            .back()
            .map_or(false, |b| b.seq_num > squashed_seq_num)
        {
            self.rob[tid].pop_back();
        }
        while self.pending[tid].front().map_or(false, |w| w.wrong_path) {
            self.pending[tid].pop_front();
        }
        self.speculating[tid] = false;
        // Resume dispatch only after the IQ has observed the squash.
        self.dispatch_hold_until[tid] =
            self.cycle + self.config.commit_to_iew_delay as Cycle + 1;
    }

    /// Inserts renamed instructions while the queue admits them.
    fn dispatch_stage(&mut self) {
        let mut dispatched = 0;
        for tid in 0..self.config.num_threads {
            if self.cycle < self.dispatch_hold_until[tid] || self.iq.is_squashing(tid) {
                continue;
            }
            while dispatched < self.config.dispatch_width {
                let Some(front) = self.pending[tid].front() else {
                    break;
                };
                // A redirect is pending: fetch only supplies the wrong path
                // until commit resolves the branch.
                if self.speculating[tid] && !front.wrong_path {
                    break;
                }
                if self.iq.is_full_for(tid) {
                    break;
                }
                let desc = self.pending[tid].pop_front().expect("pending head vanished");
                let inst = self.build_inst(tid, &desc);
                inst.set_dispatch_cycle(self.cycle);
                if desc.mispredict {
                    self.mispredicted.insert(inst.seq_num);
                    self.speculating[tid] = true;
                }

                if desc.barrier {
                    self.iq.insert_barrier(inst.clone());
                } else if desc.non_spec {
                    self.iq.insert_non_spec(inst.clone());
                } else {
                    self.iq.insert(inst.clone());
                }
                self.rob[tid].push_back(inst);
                dispatched += 1;
            }
        }
    }

    fn build_inst(&mut self, tid: ThreadId, desc: &WorkloadInst) -> DynInstRef {
        let seq = self.next_seq;
        self.next_seq += 1;
        if desc.barrier {
            DynInst::new_barrier(seq, tid)
        } else if desc.non_spec {
            DynInst::new_non_spec(seq, tid, desc.op, desc.srcs.clone(), desc.dests.clone())
        } else {
            DynInst::new_at(
                seq,
                tid,
                desc.op,
                desc.pc,
                desc.srcs.clone(),
                desc.dests.clone(),
            )
        }
    }

    /// Marks this cycle's completed bundle; memory instructions also
    /// release their ordering entry.
    fn writeback_stage(&mut self) {
        let done = std::mem::take(&mut self.i2e.write(0).insts);
        for inst in done {
            if inst.is_squashed() {
                continue;
            }
            if inst.mem_ref {
                self.iq.complete_mem_inst(&inst);
            } else {
                inst.set_completed();
            }
        }
    }
}
