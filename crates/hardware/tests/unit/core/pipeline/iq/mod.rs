//! Unit tests for the instruction queue.

/// Entry release at commit.
pub mod commit;
/// Memory instructions: ordering gates, reschedule/replay, violations.
pub mod mem;
/// Non-speculative instructions held for commit.
pub mod non_spec;
/// Oldest-first selection, issue width, FU contention.
pub mod select;
/// Squash-on-misspeculation.
pub mod squash;
