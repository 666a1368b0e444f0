//! Core scalar types shared across the simulator.
//!
//! Sequence numbers, thread identifiers, cycle counts, physical register
//! indices, and the operation-class enum that maps instructions onto
//! function units.

use serde::Deserialize;
use std::fmt;

/// Globally unique, monotonically increasing instruction sequence number.
/// Oldest instruction == smallest sequence number.
pub type SeqNum = u64;

/// Hardware thread context index.
pub type ThreadId = usize;

/// Simulated clock cycle count.
pub type Cycle = u64;

/// Index into the flat physical register space.
///
/// Integer registers occupy `[0, num_phys_int_regs)` and floating-point
/// registers occupy `[num_phys_int_regs, num_phys_regs)`. This layout is
/// contractual: register-index arithmetic in the rename map and the IQ
/// both rely on it.
pub type PhysRegId = usize;

/// Maximum number of hardware thread contexts the IQ structures are sized for.
///
/// The runtime thread count (`Config::num_threads`) must not exceed this.
pub const MAX_THREADS: usize = 4;

/// Coarse instruction category used to match instructions to function units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum OpClass {
    /// Integer ALU operation (add, logic, shifts, compares).
    #[default]
    IntAlu,
    /// Integer multiply.
    IntMult,
    /// Integer divide.
    IntDiv,
    /// Floating-point add/subtract.
    FloatAdd,
    /// Floating-point multiply.
    FloatMult,
    /// Floating-point divide.
    FloatDiv,
    /// Memory read (load).
    MemRead,
    /// Memory write (store).
    MemWrite,
    /// Control transfer (branch, jump).
    Branch,
    /// Everything else (serializing ops, CSR accesses, fences).
    Misc,
}

impl OpClass {
    /// Number of op classes; sizes the per-class ready queues and FU tables.
    pub const COUNT: usize = 10;

    /// All op classes, in index order.
    pub const ALL: [OpClass; Self::COUNT] = [
        OpClass::IntAlu,
        OpClass::IntMult,
        OpClass::IntDiv,
        OpClass::FloatAdd,
        OpClass::FloatMult,
        OpClass::FloatDiv,
        OpClass::MemRead,
        OpClass::MemWrite,
        OpClass::Branch,
        OpClass::Misc,
    ];

    /// Dense index of this op class, for table lookups.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether instructions of this class access memory.
    #[inline]
    pub fn is_mem_ref(self) -> bool {
        matches!(self, OpClass::MemRead | OpClass::MemWrite)
    }

    /// Whether instructions of this class write memory.
    #[inline]
    pub fn is_store(self) -> bool {
        matches!(self, OpClass::MemWrite)
    }

    /// Whether instructions of this class read memory.
    #[inline]
    pub fn is_load(self) -> bool {
        matches!(self, OpClass::MemRead)
    }
}

impl fmt::Display for OpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpClass::IntAlu => "IntAlu",
            OpClass::IntMult => "IntMult",
            OpClass::IntDiv => "IntDiv",
            OpClass::FloatAdd => "FloatAdd",
            OpClass::FloatMult => "FloatMult",
            OpClass::FloatDiv => "FloatDiv",
            OpClass::MemRead => "MemRead",
            OpClass::MemWrite => "MemWrite",
            OpClass::Branch => "Branch",
            OpClass::Misc => "Misc",
        };
        write!(f, "{}", name)
    }
}
