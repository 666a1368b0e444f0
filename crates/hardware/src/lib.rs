//! Out-of-order SMT CPU backend simulator.
//!
//! This crate implements the instruction queue of an out-of-order,
//! superscalar, simultaneously-multithreaded CPU simulator, with the
//! following:
//! 1. **IQ:** Dispatch, register/memory dependency tracking, wakeup, oldest-first select.
//! 2. **Timing:** Function-unit pool and completion events that turn scheduled instructions into completed ones.
//! 3. **Speculation:** Squash-on-misspeculation across partially issued state; non-speculative holds until commit.
//! 4. **SMT:** Per-thread admission under Dynamic, Partitioned, and Threshold sharing policies.
//! 5. **Simulation:** JSON workload loader, dispatch/commit harness, and statistics collection.

/// Common types and errors (sequence numbers, op classes, setup errors).
pub mod common;
/// Simulator configuration (defaults, policies, hierarchical structures).
pub mod config;
/// Backend core (instruction handles, IQ, FU pool, memory dependence).
pub mod core;
/// Workload loading and the simulation driver.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The instruction queue itself.
pub use crate::core::pipeline::iq::InstructionQueue;
/// Top-level simulation driver; construct with `Simulator::new`.
pub use crate::sim::Simulator;
