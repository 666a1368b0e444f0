//! Simulation harness: workload loading and the dispatch/commit driver.

pub mod simulator;
pub mod workload;

pub use simulator::{RunSummary, Simulator};
pub use workload::{Workload, WorkloadInst};
