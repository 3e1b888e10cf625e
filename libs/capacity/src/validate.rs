//! Allocation validation.

use rm_model::{Assignment, AssignmentId, EngineerId, ProjectId};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::total_capacity;
use crate::error::{AllocationError, Field};
use crate::MAX_TOTAL_CAPACITY;

/// How a proposal for a project the engineer is already on is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SameProjectPolicy {
    /// Add the proposal on top of the current total.
    #[default]
    Add,
    /// Drop the existing record for the proposed project before summing.
    Replace,
}

/// A proposed new assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub engineer_id: Option<EngineerId>,
    pub project_id: Option<ProjectId>,
    pub capacity: i32,
}

impl Proposal {
    /// Builds a proposal from raw input. Blank identifiers become `None`.
    pub fn from_input(engineer: &str, project: &str, capacity: i32) -> Self {
        Self {
            engineer_id: EngineerId::parse(engineer).ok(),
            project_id: ProjectId::parse(project).ok(),
            capacity,
        }
    }
}

/// An accepted allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Acceptance {
    /// Engineer total before the change.
    pub current_total: i32,
    /// Engineer total after the change.
    pub new_total: i32,
}

/// Checks a proposed assignment against the existing ones.
///
/// Rules apply in order: required fields, positive capacity, then the
/// engineer's resulting total must not exceed [`MAX_TOTAL_CAPACITY`].
pub fn validate(
    existing: &[Assignment],
    proposal: &Proposal,
    policy: SameProjectPolicy,
) -> Result<Acceptance, AllocationError> {
    let engineer_id = proposal
        .engineer_id
        .as_ref()
        .ok_or(AllocationError::MissingField(Field::Engineer))?;
    let project_id = proposal
        .project_id
        .as_ref()
        .ok_or(AllocationError::MissingField(Field::Project))?;
    if proposal.capacity <= 0 {
        return Err(AllocationError::InvalidCapacity(proposal.capacity));
    }

    let current_total = match policy {
        SameProjectPolicy::Add => total_capacity(existing, engineer_id),
        SameProjectPolicy::Replace => {
            let others: Vec<Assignment> = existing
                .iter()
                .filter(|a| !a.project.refers_to(project_id))
                .cloned()
                .collect();
            total_capacity(&others, engineer_id)
        }
    };

    check_total(engineer_id, current_total, proposal.capacity)
}

/// Checks a capacity edit of an existing assignment.
///
/// The edited record takes the new capacity in place, so duplicate records
/// for the same project are resolved the same way as in [`total_capacity`].
pub fn validate_update(
    existing: &[Assignment],
    assignment_id: &AssignmentId,
    capacity: i32,
) -> Result<Acceptance, AllocationError> {
    if capacity <= 0 {
        return Err(AllocationError::InvalidCapacity(capacity));
    }

    let target = existing
        .iter()
        .find(|a| &a.id == assignment_id)
        .ok_or_else(|| AllocationError::UnknownAssignment(assignment_id.clone()))?;
    let Some(engineer_id) = target.engineer.id() else {
        // Counted toward nobody's total; only the record itself is bounded.
        debug!(assignment_id = %assignment_id, capacity, "editing assignment without engineer");
        if capacity > MAX_TOTAL_CAPACITY {
            return Err(AllocationError::OverCapacity(capacity));
        }
        return Ok(Acceptance {
            current_total: target.effective_capacity(),
            new_total: capacity,
        });
    };

    let current_total = total_capacity(existing, engineer_id);
    let edited: Vec<Assignment> = existing
        .iter()
        .map(|a| {
            let mut a = a.clone();
            if &a.id == assignment_id {
                a.capacity = Some(capacity);
            }
            a
        })
        .collect();
    let new_total = total_capacity(&edited, engineer_id);

    debug!(
        engineer_id = %engineer_id,
        assignment_id = %assignment_id,
        current_total,
        new_total,
        "validating capacity edit"
    );

    if new_total > MAX_TOTAL_CAPACITY {
        return Err(AllocationError::OverCapacity(new_total));
    }

    Ok(Acceptance {
        current_total,
        new_total,
    })
}

fn check_total(
    engineer_id: &EngineerId,
    current_total: i32,
    requested: i32,
) -> Result<Acceptance, AllocationError> {
    let new_total = current_total.saturating_add(requested);

    debug!(
        engineer_id = %engineer_id,
        current_total,
        requested,
        new_total,
        "validating allocation"
    );

    if new_total > MAX_TOTAL_CAPACITY {
        return Err(AllocationError::OverCapacity(new_total));
    }

    Ok(Acceptance {
        current_total,
        new_total,
    })
}
