//! Property tests for the capacity rules.

use proptest::prelude::*;
use rm_capacity::{
    classify, total_capacity, validate, AllocationError, Proposal, SameProjectPolicy, Tier,
    MAX_TOTAL_CAPACITY,
};
use rm_model::{Assignment, AssignmentId, EngineerId, ProjectId, Reference};

fn assignment(index: usize, engineer: u8, project: u8, capacity: Option<i32>) -> Assignment {
    Assignment {
        id: AssignmentId::parse(&format!("a{index}")).unwrap(),
        engineer: Reference::Id(EngineerId::parse(&format!("E{engineer}")).unwrap()),
        project: Reference::Id(ProjectId::parse(&format!("P{project}")).unwrap()),
        capacity,
    }
}

fn build(rows: &[(u8, u8, Option<i32>)]) -> Vec<Assignment> {
    rows.iter()
        .enumerate()
        .map(|(i, &(e, p, c))| assignment(i, e, p, c))
        .collect()
}

/// Rows with at most one record per (engineer, project) pair.
fn distinct_rows() -> impl Strategy<Value = Vec<(u8, u8, Option<i32>)>> {
    prop::collection::btree_map((0u8..3, 0u8..6), prop::option::of(0i32..=100), 0..12)
        .prop_map(|m| m.into_iter().map(|((e, p), c)| (e, p, c)).collect())
}

proptest! {
    #[test]
    fn total_is_order_independent_without_duplicates(
        rows in distinct_rows().prop_shuffle(),
        engineer in 0u8..3,
    ) {
        let engineer_id = EngineerId::parse(&format!("E{engineer}")).unwrap();
        let mut sorted = rows.clone();
        sorted.sort();
        prop_assert_eq!(
            total_capacity(&build(&rows), &engineer_id),
            total_capacity(&build(&sorted), &engineer_id)
        );
    }

    #[test]
    fn duplicates_resolve_to_last_listed(
        first in 0i32..=100,
        last in 0i32..=100,
        other in 0i32..=100,
    ) {
        let rows = [(0, 0, Some(first)), (0, 1, Some(other)), (0, 0, Some(last))];
        let engineer_id = EngineerId::parse("E0").unwrap();
        prop_assert_eq!(total_capacity(&build(&rows), &engineer_id), last + other);
    }

    #[test]
    fn validate_is_pure(
        rows in distinct_rows(),
        engineer in 0u8..3,
        project in 0u8..6,
        capacity in -10i32..=120,
    ) {
        let existing = build(&rows);
        let proposal = Proposal::from_input(&format!("E{engineer}"), &format!("P{project}"), capacity);
        prop_assert_eq!(
            validate(&existing, &proposal, SameProjectPolicy::Add),
            validate(&existing, &proposal, SameProjectPolicy::Add)
        );
    }

    #[test]
    fn accepted_sequence_never_overbooks(
        proposals in prop::collection::vec((0u8..6, 1i32..=100), 0..20),
    ) {
        let engineer_id = EngineerId::parse("E0").unwrap();
        let mut existing: Vec<Assignment> = Vec::new();

        for (project, capacity) in proposals {
            let proposal = Proposal::from_input("E0", &format!("P{project}"), capacity);
            match validate(&existing, &proposal, SameProjectPolicy::Add) {
                Ok(_) => existing.push(assignment(existing.len(), 0, project, Some(capacity))),
                Err(err) => prop_assert!(err.is_over_capacity()),
            }
            prop_assert!(total_capacity(&existing, &engineer_id) <= MAX_TOTAL_CAPACITY);
        }
    }

    #[test]
    fn remainder_boundary(current in 0i32..100) {
        let existing = build(&[(0, 0, Some(current))]);
        let exact = Proposal::from_input("E0", "P1", MAX_TOTAL_CAPACITY - current);
        let over = Proposal::from_input("E0", "P1", MAX_TOTAL_CAPACITY - current + 1);

        prop_assert!(validate(&existing, &exact, SameProjectPolicy::Add).is_ok());
        prop_assert_eq!(
            validate(&existing, &over, SameProjectPolicy::Add),
            Err(AllocationError::OverCapacity(MAX_TOTAL_CAPACITY + 1))
        );
    }

    #[test]
    fn classify_is_monotonic(a in -50i32..200, b in -50i32..200) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo) <= classify(hi));
    }
}

#[test]
fn scenario_duplicate_project() {
    let existing = build(&[(1, 1, Some(60)), (1, 1, Some(30))]);
    let engineer_id = EngineerId::parse("E1").unwrap();
    assert_eq!(total_capacity(&existing, &engineer_id), 30);
}

#[test]
fn scenario_tiers() {
    assert_eq!(classify(50), Tier::Normal);
    assert_eq!(classify(51), Tier::Warning);
    assert_eq!(classify(81), Tier::Overloaded);
}
