//! Function-unit pool.
//!
//! Holds the simulated execution resources. Each unit serves a set of op
//! classes; timing (latency, pipelining) is a property of the op class. The
//! IQ requests a unit at select time and returns it either the next cycle
//! (pipelined classes) or when the completion event fires (unpipelined).

use crate::common::types::{Cycle, OpClass};
use crate::config::FuPoolConfig;
use log::trace;

/// Outcome of asking the pool for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuRequest {
    /// A unit was reserved; the index must be given back via
    /// [`FuPool::free_unit`] or [`FuPool::release_next_cycle`].
    Granted(usize),
    /// Units of this class exist but are all busy this cycle.
    Busy,
    /// No unit in the pool can serve this op class. The caller issues the
    /// instruction with default timing and owes the pool nothing.
    NoCapability,
}

#[derive(Debug)]
struct FuUnit {
    caps: [bool; OpClass::COUNT],
    busy: bool,
}

/// Pool of function units plus per-op-class timing.
#[derive(Debug)]
pub struct FuPool {
    units: Vec<FuUnit>,
    latency: [Cycle; OpClass::COUNT],
    pipelined: [bool; OpClass::COUNT],
    /// Units released by pipelined issues, made free at the next cycle
    /// boundary.
    pending_release: Vec<usize>,
}

impl FuPool {
    /// Builds the pool from configuration. Classes without an explicit
    /// latency entry default to 1 cycle, pipelined.
    pub fn new(config: &FuPoolConfig) -> Self {
        let mut latency = [1; OpClass::COUNT];
        let mut pipelined = [true; OpClass::COUNT];
        for entry in &config.latencies {
            latency[entry.op_class.index()] = entry.latency;
            pipelined[entry.op_class.index()] = entry.pipelined;
        }

        let mut units = Vec::new();
        for desc in &config.units {
            let mut caps = [false; OpClass::COUNT];
            for class in &desc.op_classes {
                caps[class.index()] = true;
            }
            for _ in 0..desc.count {
                units.push(FuUnit { caps, busy: false });
            }
        }

        Self {
            units,
            latency,
            pipelined,
            pending_release: Vec::new(),
        }
    }

    /// Number of units in the pool.
    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    /// Whether any unit (busy or not) can serve `op_class`.
    pub fn has_capability(&self, op_class: OpClass) -> bool {
        let idx = op_class.index();
        self.units.iter().any(|u| u.caps[idx])
    }

    /// Tries to reserve a free unit for `op_class`.
    pub fn get_unit(&mut self, op_class: OpClass) -> FuRequest {
        let idx = op_class.index();
        let mut capable = false;
        for (i, unit) in self.units.iter_mut().enumerate() {
            if !unit.caps[idx] {
                continue;
            }
            capable = true;
            if !unit.busy {
                unit.busy = true;
                trace!("fu pool: unit {} granted for {}", i, op_class);
                return FuRequest::Granted(i);
            }
        }
        if capable {
            FuRequest::Busy
        } else {
            FuRequest::NoCapability
        }
    }

    /// Returns a unit to the free set immediately.
    ///
    /// # Panics
    ///
    /// Freeing a unit that is not busy is a caller bug and fatal.
    pub fn free_unit(&mut self, fu_idx: usize) {
        let unit = &mut self.units[fu_idx];
        assert!(unit.busy, "freeing idle function unit {}", fu_idx);
        unit.busy = false;
    }

    /// Marks a unit for release at the next cycle boundary. Used by
    /// pipelined classes, where the unit can accept a new instruction every
    /// cycle even though the previous one is still in flight.
    pub fn release_next_cycle(&mut self, fu_idx: usize) {
        debug_assert!(self.units[fu_idx].busy);
        self.pending_release.push(fu_idx);
    }

    /// Cycle-boundary maintenance: frees units whose pipelined issue slot
    /// has passed.
    pub fn advance_cycle(&mut self) {
        let pending = std::mem::take(&mut self.pending_release);
        for idx in pending {
            self.free_unit(idx);
        }
    }

    /// Execution latency of `op_class`, in cycles from schedule to
    /// completion.
    #[inline]
    pub fn get_latency(&self, op_class: OpClass) -> Cycle {
        self.latency[op_class.index()]
    }

    /// Whether units serving `op_class` accept a new instruction each cycle.
    #[inline]
    pub fn is_pipelined(&self, op_class: OpClass) -> bool {
        self.pipelined[op_class.index()]
    }
}
