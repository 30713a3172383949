//! Deterministic priority waterfall
//!
//! An alternative allocation mode with no equilibrium reasoning: groups are
//! served strictly in priority order, and each group fills its preferred
//! programme types in ranking order until its demand or the seats run out.
//!
//! # Critical Invariants
//!
//! 1. **Capacity**: seats placed in a type never exceed the pool
//! 2. **Demand**: a group never receives more seats than it demands
//! 3. **Priority**: a later group only sees what earlier groups left behind

use crate::models::{GroupStatistics, ProgrammeType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in a waterfall request
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocationError {
    #[error("Group {group} ranks {programme} more than once")]
    DuplicatePreference {
        group: String,
        programme: ProgrammeType,
    },
}

/// Seats available per programme type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatPool {
    seats: [u64; 3],
}

impl SeatPool {
    pub fn new(seats_a: u64, seats_b: u64, seats_c: u64) -> Self {
        Self {
            seats: [seats_a, seats_b, seats_c],
        }
    }

    pub fn from_statistics(stats: &GroupStatistics) -> Self {
        Self::new(stats.seats_a, stats.seats_b, stats.seats_c)
    }

    pub fn seats(&self, programme: ProgrammeType) -> u64 {
        self.seats[programme.index()]
    }

    pub fn total(&self) -> u64 {
        self.seats.iter().sum()
    }
}

/// One group's request, in the order the group is served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDemand {
    pub label: String,
    pub demand: u64,
    /// Most preferred first; types left out are never taken
    pub ranking: Vec<ProgrammeType>,
}

/// Seats one group received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAllocation {
    pub label: String,
    /// Seats per type, indexed by [`ProgrammeType::index`]
    pub placed: [u64; 3],
    /// Demand left without a seat
    pub unplaced: u64,
}

impl GroupAllocation {
    pub fn seats(&self, programme: ProgrammeType) -> u64 {
        self.placed[programme.index()]
    }

    pub fn total_placed(&self) -> u64 {
        self.placed.iter().sum()
    }
}

/// Result of a waterfall run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationTable {
    /// Per-group allocations in priority order
    pub groups: Vec<GroupAllocation>,
    /// Seats nobody took
    pub remaining: SeatPool,
}

impl AllocationTable {
    pub fn group(&self, label: &str) -> Option<&GroupAllocation> {
        self.groups.iter().find(|group| group.label == label)
    }
}

/// Run the waterfall
///
/// # Errors
///
/// [`AllocationError::DuplicatePreference`] if a ranking lists a type twice.
/// Rankings are checked before any seat is placed.
///
/// # Example
///
/// ```rust
/// use admission_equilibrium_core::allocation::waterfall::{allocate, GroupDemand, SeatPool};
/// use admission_equilibrium_core::ProgrammeType::{A, B, C};
///
/// let groups = vec![
///     GroupDemand { label: "A".into(), demand: 5, ranking: vec![A, B, C] },
///     GroupDemand { label: "B".into(), demand: 5, ranking: vec![A, B, C] },
/// ];
/// let table = allocate(&groups, SeatPool::new(3, 3, 3)).unwrap();
///
/// assert_eq!(table.groups[0].placed, [3, 2, 0]);
/// assert_eq!(table.groups[1].placed, [0, 1, 3]);
/// assert_eq!(table.remaining.total(), 0);
/// ```
pub fn allocate(groups: &[GroupDemand], pool: SeatPool) -> Result<AllocationTable, AllocationError> {
    for group in groups {
        check_ranking(group)?;
    }

    let mut remaining = pool;
    let allocations: Vec<GroupAllocation> = groups
        .iter()
        .map(|group| {
            let mut placed = [0u64; 3];
            let mut unplaced = group.demand;

            for &programme in &group.ranking {
                if unplaced == 0 {
                    break;
                }
                let slot = &mut remaining.seats[programme.index()];
                let take = unplaced.min(*slot);
                *slot -= take;
                placed[programme.index()] += take;
                unplaced -= take;
            }

            GroupAllocation {
                label: group.label.clone(),
                placed,
                unplaced,
            }
        })
        .collect();

    Ok(AllocationTable {
        groups: allocations,
        remaining,
    })
}

fn check_ranking(group: &GroupDemand) -> Result<(), AllocationError> {
    let mut seen = [false; 3];
    for &programme in &group.ranking {
        let flag = &mut seen[programme.index()];
        if *flag {
            return Err(AllocationError::DuplicatePreference {
                group: group.label.clone(),
                programme,
            });
        }
        *flag = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProgrammeType::{A, B, C};

    fn demand(label: &str, demand: u64, ranking: Vec<ProgrammeType>) -> GroupDemand {
        GroupDemand {
            label: label.to_string(),
            demand,
            ranking,
        }
    }

    #[test]
    fn test_omitted_type_is_never_taken() {
        let groups = vec![demand("picky", 10, vec![A])];
        let table = allocate(&groups, SeatPool::new(4, 4, 4)).unwrap();

        assert_eq!(table.groups[0].placed, [4, 0, 0]);
        assert_eq!(table.groups[0].unplaced, 6);
        assert_eq!(table.remaining, SeatPool::new(0, 4, 4));
    }

    #[test]
    fn test_duplicate_preference_rejected_before_placing() {
        let groups = vec![demand("ok", 1, vec![A]), demand("bad", 1, vec![B, C, B])];
        let err = allocate(&groups, SeatPool::new(1, 1, 1)).unwrap_err();

        assert_eq!(
            err,
            AllocationError::DuplicatePreference {
                group: "bad".to_string(),
                programme: B,
            }
        );
    }

    #[test]
    fn test_lookup_by_label() {
        let groups = vec![demand("first", 2, vec![C, B]), demand("second", 2, vec![C])];
        let table = allocate(&groups, SeatPool::new(0, 5, 1)).unwrap();

        assert_eq!(table.group("first").unwrap().placed, [0, 1, 1]);
        assert_eq!(table.group("second").unwrap().unplaced, 2);
        assert!(table.group("third").is_none());
    }
}
