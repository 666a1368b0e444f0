//! Workload definition and loading.
//!
//! A workload is a JSON description of a renamed instruction stream: one
//! record per instruction with its thread, op class, physical source and
//! destination registers, and scheduling flags. The dispatch harness feeds
//! these through the instruction queue in order, per thread.
//!
//! Example:
//!
//! ```json
//! { "insts": [
//!     { "op": "IntMult", "dests": [7] },
//!     { "op": "IntAlu",  "srcs": [7], "dests": [8] },
//!     { "op": "Branch",  "srcs": [8], "mispredict": true },
//!     { "op": "IntAlu",  "dests": [9], "wrong_path": true }
//! ] }
//! ```

use crate::common::types::{PhysRegId, ThreadId};
use crate::common::{OpClass, SimError};
use crate::config::Config;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One instruction record in a workload file.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadInst {
    /// Hardware thread the instruction belongs to.
    #[serde(default)]
    pub thread: ThreadId,
    /// Op class; also decides whether the instruction is a memory reference.
    #[serde(default)]
    pub op: OpClass,
    /// Program counter; only meaningful to the memory-dependence predictor.
    #[serde(default)]
    pub pc: u64,
    /// Physical source registers.
    #[serde(default)]
    pub srcs: Vec<PhysRegId>,
    /// Physical destination registers.
    #[serde(default)]
    pub dests: Vec<PhysRegId>,
    /// Hold until commit releases it (serializing op, store at commit).
    #[serde(default)]
    pub non_spec: bool,
    /// Memory/write barrier. Implies non-speculative; op is ignored.
    #[serde(default)]
    pub barrier: bool,
    /// When this instruction commits, squash everything younger.
    #[serde(default)]
    pub mispredict: bool,
    /// Fetched down a mispredicted path: exists to be squashed, never to
    /// commit.
    #[serde(default)]
    pub wrong_path: bool,
}

/// A parsed instruction stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workload {
    /// Instructions in program (dispatch) order.
    pub insts: Vec<WorkloadInst>,
}

impl Workload {
    /// Parses a workload from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a workload file.
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every record against the configured machine.
    pub fn validate(&self, config: &Config) -> Result<(), SimError> {
        let num_phys_regs = config.num_phys_regs();
        for (i, inst) in self.insts.iter().enumerate() {
            if inst.thread >= config.num_threads {
                return Err(SimError::Workload(format!(
                    "inst {}: thread {} but machine has {}",
                    i, inst.thread, config.num_threads
                )));
            }
            for &reg in inst.srcs.iter().chain(inst.dests.iter()) {
                if reg >= num_phys_regs {
                    return Err(SimError::Workload(format!(
                        "inst {}: register {} outside the {}-register space",
                        i, reg, num_phys_regs
                    )));
                }
            }
            if inst.barrier && (!inst.srcs.is_empty() || !inst.dests.is_empty()) {
                return Err(SimError::Workload(format!(
                    "inst {}: barriers carry no register operands",
                    i
                )));
            }
            if inst.wrong_path && inst.mispredict {
                return Err(SimError::Workload(format!(
                    "inst {}: wrong_path and mispredict are mutually exclusive",
                    i
                )));
            }
        }
        Ok(())
    }
}
