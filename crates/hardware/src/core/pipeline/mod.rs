//! Backend pipeline structures.
//!
//! The instruction queue and its collaborators:
//! 1. **IQ:** Dispatch/wakeup/select and execution-latency timing.
//! 2. **FU pool:** The execution resources the IQ schedules onto.
//! 3. **Memory dependence:** Per-thread ordering gates for loads and stores.
//! 4. **Time buffers and latches:** Delayed signals between commit, the IQ, and execute.

/// Function-unit pool.
pub mod fu_pool;

/// Instruction queue: dispatch, wakeup, select, squash.
pub mod iq;

/// Payload types carried through the time buffers.
pub mod latches;

/// Per-thread memory dependence unit.
pub mod mem_dep;

/// Delayed inter-stage communication buffer.
pub mod time_buffer;
