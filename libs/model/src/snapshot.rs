//! Client-local copy of backend state.
//!
//! A snapshot is fetched per command and owned by it. Backend responses to
//! writes are merged back in so the capacity view can be recomputed without
//! another round trip. Nothing synchronizes two snapshots.

use crate::ids::{AssignmentId, EngineerId};
use crate::records::{Assignment, Engineer, Project};

/// Engineers, projects and assignments as last seen by this client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub engineers: Vec<Engineer>,
    pub projects: Vec<Project>,
    pub assignments: Vec<Assignment>,
}

impl Snapshot {
    pub fn new(
        engineers: Vec<Engineer>,
        projects: Vec<Project>,
        assignments: Vec<Assignment>,
    ) -> Self {
        Self {
            engineers,
            projects,
            assignments,
        }
    }

    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Replaces the assignment with the same id. Returns false if absent.
    pub fn replace_assignment(&mut self, assignment: Assignment) -> bool {
        match self.assignments.iter_mut().find(|a| a.id == assignment.id) {
            Some(slot) => {
                *slot = assignment;
                true
            }
            None => false,
        }
    }

    /// Removes the assignment with `id`, returning it if present.
    pub fn remove_assignment(&mut self, id: &AssignmentId) -> Option<Assignment> {
        let index = self.assignments.iter().position(|a| &a.id == id)?;
        Some(self.assignments.remove(index))
    }

    /// Assignments whose engineer reference resolves to `engineer_id`, in listing order.
    pub fn assignments_for<'a>(
        &'a self,
        engineer_id: &'a EngineerId,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments
            .iter()
            .filter(move |a| a.engineer.refers_to(engineer_id))
    }
}
