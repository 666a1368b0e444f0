//! Core backend implementation.
//!
//! This module contains the out-of-order backend components: the in-flight
//! instruction representation and the pipeline structures built around the
//! instruction queue.

/// In-flight dynamic instruction handle.
pub mod inst;

/// Pipeline structures: instruction queue, FU pool, memory dependence
/// tracking, and time buffers.
pub mod pipeline;

pub use self::inst::{DynInst, DynInstRef};
pub use self::pipeline::iq::InstructionQueue;
