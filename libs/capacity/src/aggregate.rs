//! Per-engineer capacity totals.

use std::collections::HashMap;

use rm_model::{Assignment, EngineerId, ProjectId};

/// Returns the assignments that count toward `engineer_id`'s total.
///
/// Assignments are filtered by resolved engineer reference, then reduced to
/// one record per project: the last one listed wins. Projects keep the
/// position of their first occurrence. Records whose project is missing
/// share a single slot.
pub fn effective_assignments<'a>(
    assignments: &'a [Assignment],
    engineer_id: &EngineerId,
) -> Vec<&'a Assignment> {
    let mut effective: Vec<&'a Assignment> = Vec::new();
    let mut slots: HashMap<Option<&ProjectId>, usize> = HashMap::new();

    for assignment in assignments
        .iter()
        .filter(|a| a.engineer.refers_to(engineer_id))
    {
        match slots.get(&assignment.project.id()) {
            Some(&index) => effective[index] = assignment,
            None => {
                slots.insert(assignment.project.id(), effective.len());
                effective.push(assignment);
            }
        }
    }

    effective
}

/// Sums the capacity of `engineer_id`'s effective assignments.
///
/// Missing capacities count as 0. The sum saturates rather than overflowing.
pub fn total_capacity(assignments: &[Assignment], engineer_id: &EngineerId) -> i32 {
    effective_assignments(assignments, engineer_id)
        .into_iter()
        .fold(0i32, |sum, a| sum.saturating_add(a.effective_capacity()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rm_model::{AssignmentId, Engineer, Reference};

    fn assignment(id: &str, engineer: &str, project: &str, capacity: Option<i32>) -> Assignment {
        Assignment {
            id: AssignmentId::parse(id).unwrap(),
            engineer: Reference::Id(EngineerId::parse(engineer).unwrap()),
            project: Reference::Id(ProjectId::parse(project).unwrap()),
            capacity,
        }
    }

    fn e1() -> EngineerId {
        EngineerId::parse("E1").unwrap()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(total_capacity(&[], &e1()), 0);
    }

    #[test]
    fn test_duplicate_project_counts_last_listed() {
        let existing = vec![
            assignment("a1", "E1", "P1", Some(60)),
            assignment("a2", "E1", "P1", Some(30)),
        ];
        assert_eq!(total_capacity(&existing, &e1()), 30);

        let effective = effective_assignments(&existing, &e1());
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].id.as_str(), "a2");
    }

    #[test]
    fn test_other_engineers_are_ignored() {
        let existing = vec![
            assignment("a1", "E1", "P1", Some(40)),
            assignment("a2", "E2", "P2", Some(50)),
            assignment("a3", "E1", "P2", Some(25)),
        ];
        assert_eq!(total_capacity(&existing, &e1()), 65);
    }

    #[test]
    fn test_missing_capacity_counts_zero() {
        let existing = vec![
            assignment("a1", "E1", "P1", None),
            assignment("a2", "E1", "P2", Some(20)),
        ];
        assert_eq!(total_capacity(&existing, &e1()), 20);
    }

    #[test]
    fn test_expanded_and_bare_references_match() {
        let expanded: Engineer = serde_json::from_value(serde_json::json!({
            "_id": "E1",
            "name": "Ada",
        }))
        .unwrap();
        let mut a = assignment("a1", "E1", "P1", Some(35));
        a.engineer = Reference::Expanded(expanded);
        let existing = vec![a, assignment("a2", "E1", "P2", Some(15))];
        assert_eq!(total_capacity(&existing, &e1()), 50);
    }

    #[test]
    fn test_first_occurrence_order_is_kept() {
        let existing = vec![
            assignment("a1", "E1", "P1", Some(10)),
            assignment("a2", "E1", "P2", Some(20)),
            assignment("a3", "E1", "P1", Some(30)),
        ];
        let ids: Vec<_> = effective_assignments(&existing, &e1())
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a3", "a2"]);
    }

    #[test]
    fn test_sum_saturates() {
        let existing = vec![
            assignment("a1", "E1", "P1", Some(i32::MAX)),
            assignment("a2", "E1", "P2", Some(10)),
        ];
        assert_eq!(total_capacity(&existing, &e1()), i32::MAX);
    }

    #[test]
    fn test_missing_references() {
        let assignments: Vec<Assignment> = serde_json::from_value(serde_json::json!([
            {"_id": "a1", "engineerId": "E1", "projectId": "P1", "capacity": 60},
            {"_id": "a2", "engineerId": null, "projectId": "P2", "capacity": 30},
            {"_id": "a3", "engineerId": "E1", "projectId": null, "capacity": 5},
            {"_id": "a4", "engineerId": "E1", "projectId": null, "capacity": 15},
        ]))
        .unwrap();

        // The null engineer belongs to nobody; null projects share one slot.
        assert_eq!(total_capacity(&assignments, &e1()), 75);
        let ids: Vec<_> = effective_assignments(&assignments, &e1())
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a1", "a4"]);
    }
}
