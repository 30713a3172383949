//! Deterministic Waterfall Allocation Tests

use admission_equilibrium_core::allocation::waterfall::{allocate, GroupDemand, SeatPool};
use admission_equilibrium_core::{
    allocate_deterministic, validate, AllocationError, PreferenceRankings, ProgrammeType,
    RawParameters,
};
use ProgrammeType::{A, B, C};

fn demand(label: &str, demand: u64, ranking: Vec<ProgrammeType>) -> GroupDemand {
    GroupDemand {
        label: label.to_string(),
        demand,
        ranking,
    }
}

#[test]
fn test_groups_served_in_priority_order() {
    let groups = vec![demand("first", 4, vec![B, A]), demand("second", 4, vec![B, A])];
    let table = allocate(&groups, SeatPool::new(2, 3, 0)).unwrap();

    assert_eq!(table.groups[0].placed, [1, 3, 0]);
    assert_eq!(table.groups[1].placed, [1, 0, 0]);
    assert_eq!(table.groups[1].unplaced, 3);
    assert_eq!(table.remaining.total(), 0);
}

#[test]
fn test_capacity_and_demand_respected() {
    let groups = vec![demand("x", 10, vec![A, B, C]), demand("y", 10, vec![C, B, A])];
    let pool = SeatPool::new(5, 5, 5);
    let table = allocate(&groups, pool).unwrap();

    for programme in ProgrammeType::ALL {
        let used: u64 = table.groups.iter().map(|g| g.seats(programme)).sum();
        assert_eq!(used + table.remaining.seats(programme), pool.seats(programme));
    }
    for group in &table.groups {
        assert_eq!(group.total_placed() + group.unplaced, 10);
    }
}

#[test]
fn test_empty_ranking_places_nobody() {
    let table = allocate(&[demand("none", 7, vec![])], SeatPool::new(1, 1, 1)).unwrap();
    assert_eq!(table.groups[0].unplaced, 7);
    assert_eq!(table.remaining, SeatPool::new(1, 1, 1));
}

#[test]
fn test_market_waterfall_with_default_rankings() {
    let params = validate(RawParameters::default()).unwrap();
    let table = allocate_deterministic(&params, &PreferenceRankings::default()).unwrap();

    assert_eq!(table.group("A").unwrap().placed, [3_000, 0, 0]);
    assert_eq!(table.group("B").unwrap().placed, [0, 3_000, 3_000]);
    assert_eq!(table.remaining.total(), 0);
}

#[test]
fn test_market_waterfall_with_custom_rankings() {
    let params = validate(RawParameters::default()).unwrap();
    let rankings = PreferenceRankings {
        group_a: vec![A],
        group_b: vec![C, B],
    };
    let table = allocate_deterministic(&params, &rankings).unwrap();

    assert_eq!(table.group("B").unwrap().placed, [0, 3_000, 3_000]);
    assert_eq!(table.group("B").unwrap().unplaced, 1_000);
    assert_eq!(table.remaining, SeatPool::new(0, 0, 0));
}

#[test]
fn test_duplicate_ranking_rejected() {
    let params = validate(RawParameters::default()).unwrap();
    let rankings = PreferenceRankings {
        group_a: vec![A, A],
        group_b: vec![B, C],
    };
    let err = allocate_deterministic(&params, &rankings).unwrap_err();

    assert_eq!(
        err,
        AllocationError::DuplicatePreference {
            group: "A".to_string(),
            programme: A,
        }
    );
    assert!(err.to_string().contains("Type A"));
}
