//! Configuration system for the out-of-order core simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the backend. It provides:
//! 1. **Defaults:** Baseline machine constants (IQ capacity, widths, register file sizes).
//! 2. **Structures:** Hierarchical config for the machine, the instruction queue, and the FU pool.
//! 3. **Enums:** The SMT resource-sharing policy for IQ entries.
//!
//! Configuration is supplied as JSON (`serde_json`) or built with
//! `Config::default()` for the CLI.

use crate::common::types::{Cycle, OpClass, MAX_THREADS};
use serde::Deserialize;

/// Default configuration constants for the simulated backend.
mod defaults {
    /// Number of hardware thread contexts.
    pub const NUM_THREADS: usize = 1;

    /// Total instruction queue capacity, shared across threads.
    pub const IQ_ENTRIES: usize = 64;

    /// Maximum instructions issued to function units per cycle.
    pub const ISSUE_WIDTH: usize = 8;

    /// Maximum instructions accepted from dispatch per cycle.
    pub const DISPATCH_WIDTH: usize = 8;

    /// Number of physical integer registers.
    ///
    /// Integer registers occupy the low indices of the flat physical
    /// register space; floating-point registers follow.
    pub const PHYS_INT_REGS: usize = 96;

    /// Number of physical floating-point registers.
    pub const PHYS_FLOAT_REGS: usize = 96;

    /// Cycles between commit producing a signal and the IQ observing it.
    pub const COMMIT_TO_IEW_DELAY: usize = 1;

    /// Instructions the squash engine removes per cycle; 0 = unbounded.
    pub const SQUASH_WIDTH: usize = 0;

    /// Per-thread IQ entry cap under the Threshold sharing policy.
    pub const IQ_THRESHOLD: usize = 32;
}

/// SMT resource-sharing policy for instruction queue entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum IqPolicy {
    /// Every active thread may use the whole queue; full means zero free entries.
    #[default]
    Dynamic,
    /// The queue is split evenly among active threads.
    Partitioned,
    /// Each thread is capped at a fixed threshold of entries.
    Threshold,
}

/// One function-unit description: how many copies exist and which op
/// classes they serve.
#[derive(Debug, Clone, Deserialize)]
pub struct FuUnitConfig {
    /// Number of identical units of this kind.
    #[serde(default = "one")]
    pub count: usize,
    /// Op classes these units can execute.
    pub op_classes: Vec<OpClass>,
}

fn one() -> usize {
    1
}

/// Execution latency and pipelining for one op class.
#[derive(Debug, Clone, Deserialize)]
pub struct OpLatencyConfig {
    /// The op class being described.
    pub op_class: OpClass,
    /// Cycles from schedule to completion. Zero means the result is
    /// available in the issue cycle (back-to-back wakeup).
    pub latency: Cycle,
    /// Whether a new instruction of this class can start on the same unit
    /// every cycle. Non-pipelined units stay busy until completion.
    #[serde(default = "yes")]
    pub pipelined: bool,
}

fn yes() -> bool {
    true
}

/// Function-unit pool configuration: the units and the per-class timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FuPoolConfig {
    /// The unit descriptions.
    pub units: Vec<FuUnitConfig>,
    /// Per-class execution latencies. Classes not listed default to 1 cycle,
    /// pipelined.
    pub latencies: Vec<OpLatencyConfig>,
}

impl Default for FuPoolConfig {
    fn default() -> Self {
        Self {
            units: vec![
                FuUnitConfig {
                    count: 4,
                    op_classes: vec![OpClass::IntAlu, OpClass::Branch, OpClass::Misc],
                },
                FuUnitConfig {
                    count: 1,
                    op_classes: vec![OpClass::IntMult, OpClass::IntDiv],
                },
                FuUnitConfig {
                    count: 2,
                    op_classes: vec![OpClass::FloatAdd, OpClass::FloatMult, OpClass::FloatDiv],
                },
                FuUnitConfig {
                    count: 2,
                    op_classes: vec![OpClass::MemRead, OpClass::MemWrite],
                },
            ],
            latencies: vec![
                OpLatencyConfig {
                    op_class: OpClass::IntAlu,
                    latency: 0,
                    pipelined: true,
                },
                OpLatencyConfig {
                    op_class: OpClass::Branch,
                    latency: 0,
                    pipelined: true,
                },
                OpLatencyConfig {
                    op_class: OpClass::IntMult,
                    latency: 3,
                    pipelined: true,
                },
                OpLatencyConfig {
                    op_class: OpClass::IntDiv,
                    latency: 12,
                    pipelined: false,
                },
                OpLatencyConfig {
                    op_class: OpClass::FloatAdd,
                    latency: 2,
                    pipelined: true,
                },
                OpLatencyConfig {
                    op_class: OpClass::FloatMult,
                    latency: 4,
                    pipelined: true,
                },
                OpLatencyConfig {
                    op_class: OpClass::FloatDiv,
                    latency: 12,
                    pipelined: false,
                },
                OpLatencyConfig {
                    op_class: OpClass::MemRead,
                    latency: 2,
                    pipelined: true,
                },
                OpLatencyConfig {
                    op_class: OpClass::MemWrite,
                    latency: 1,
                    pipelined: true,
                },
                OpLatencyConfig {
                    op_class: OpClass::Misc,
                    latency: 1,
                    pipelined: true,
                },
            ],
        }
    }
}

/// Instruction queue configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IqConfig {
    /// Total IQ capacity, shared across threads.
    pub num_entries: usize,
    /// Maximum instructions issued per cycle.
    pub issue_width: usize,
    /// SMT entry-sharing policy.
    pub policy: IqPolicy,
    /// Per-thread entry cap under the Threshold policy.
    pub threshold: usize,
    /// Instructions the squash engine removes per cycle; 0 = unbounded.
    pub squash_width: usize,
}

impl Default for IqConfig {
    fn default() -> Self {
        Self {
            num_entries: defaults::IQ_ENTRIES,
            issue_width: defaults::ISSUE_WIDTH,
            policy: IqPolicy::Dynamic,
            threshold: defaults::IQ_THRESHOLD,
            squash_width: defaults::SQUASH_WIDTH,
        }
    }
}

/// Top-level simulator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of hardware thread contexts (at most [`MAX_THREADS`]).
    pub num_threads: usize,
    /// Number of physical integer registers.
    pub num_phys_int_regs: usize,
    /// Number of physical floating-point registers.
    pub num_phys_float_regs: usize,
    /// Cycles between commit producing a signal and the IQ observing it.
    pub commit_to_iew_delay: usize,
    /// Maximum instructions accepted from dispatch per cycle.
    pub dispatch_width: usize,
    /// Instruction queue parameters.
    pub iq: IqConfig,
    /// Function-unit pool parameters.
    pub fu_pool: FuPoolConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: defaults::NUM_THREADS,
            num_phys_int_regs: defaults::PHYS_INT_REGS,
            num_phys_float_regs: defaults::PHYS_FLOAT_REGS,
            commit_to_iew_delay: defaults::COMMIT_TO_IEW_DELAY,
            dispatch_width: defaults::DISPATCH_WIDTH,
            iq: IqConfig::default(),
            fu_pool: FuPoolConfig::default(),
        }
    }
}

impl Config {
    /// Total size of the flat physical register space.
    #[inline]
    pub fn num_phys_regs(&self) -> usize {
        self.num_phys_int_regs + self.num_phys_float_regs
    }

    /// Validates cross-field consistency.
    pub fn validate(&self) -> Result<(), crate::common::SimError> {
        use crate::common::SimError;
        if self.num_threads == 0 || self.num_threads > MAX_THREADS {
            return Err(SimError::Config(format!(
                "num_threads must be in 1..={}, got {}",
                MAX_THREADS, self.num_threads
            )));
        }
        if self.iq.num_entries == 0 {
            return Err(SimError::Config("iq.num_entries must be nonzero".into()));
        }
        if self.iq.issue_width == 0 {
            return Err(SimError::Config("iq.issue_width must be nonzero".into()));
        }
        if self.iq.policy == IqPolicy::Threshold && self.iq.threshold == 0 {
            return Err(SimError::Config(
                "iq.threshold must be nonzero under the Threshold policy".into(),
            ));
        }
        Ok(())
    }
}
