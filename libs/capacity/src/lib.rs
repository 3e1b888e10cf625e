//! Capacity allocation rules.
//!
//! An engineer's time is split across projects by percentage, one
//! assignment record per (engineer, project) pair. This library computes
//! and constrains those splits:
//!
//! - **Aggregation**: an engineer's total across their assignments, counting
//!   only the last-listed record per project.
//! - **Validation**: whether a proposed assignment or capacity edit keeps the
//!   engineer at or under [`MAX_TOTAL_CAPACITY`].
//! - **Classification**: which load tier a total falls in, for display.
//!
//! # Invariants
//!
//! - Every function is pure over its arguments; nothing is cached
//! - Missing capacity values count as 0
//! - An accepted proposal never takes the total above [`MAX_TOTAL_CAPACITY`]
//!   when proposals are validated against the updated state in sequence
//!
//! Validation here is advisory. Two clients validating against stale
//! snapshots can both be accepted; the backend must re-check the bound.

mod aggregate;
mod classify;
mod error;
mod validate;

pub use aggregate::{effective_assignments, total_capacity};
pub use classify::{bar_fill, classify, Tier, NORMAL_MAX, WARNING_MAX};
pub use error::{AllocationError, Field};
pub use validate::{validate, validate_update, Acceptance, Proposal, SameProjectPolicy};

/// Upper bound on an engineer's summed capacity, in percent.
pub const MAX_TOTAL_CAPACITY: i32 = 100;
