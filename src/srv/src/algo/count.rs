//! Shift tallies per staff member.

use crate::data::{RosterWeek, StaffId};
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};

/// How many slots each staff member holds, per day and over the week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftCounts {
    daily: FxHashMap<StaffId, SmallVec<[u32; 7]>>,
    weekly: FxHashMap<StaffId, u32>,
}

impl ShiftCounts {
    /// Count every assigned slot of `week`, whatever its kind.
    ///
    /// Days are indexed by their position in [`RosterWeek::days`].
    pub fn tally(week: &RosterWeek) -> Self {
        let days = week.days.len();
        let mut counts = Self::default();
        for (pos, slot) in week.slots() {
            let Some(staff) = slot.staff else { continue };
            let per_day = counts
                .daily
                .entry(staff)
                .or_insert_with(|| smallvec![0; days]);
            if let Some(n) = per_day.get_mut(pos.day) {
                *n += 1;
            }
        }
        counts.weekly = counts
            .daily
            .iter()
            .map(|(&staff, per_day)| (staff, per_day.iter().sum()))
            .collect();
        counts
    }

    /// Slots `staff` holds on the day at position `day`.
    #[inline]
    pub fn on_day(&self, staff: StaffId, day: usize) -> u32 {
        self.daily
            .get(&staff)
            .and_then(|per_day| per_day.get(day))
            .copied()
            .unwrap_or(0)
    }

    /// Slots `staff` holds over the whole week.
    #[inline]
    pub fn weekly(&self, staff: StaffId) -> u32 {
        self.weekly.get(&staff).copied().unwrap_or(0)
    }

    /// Number of distinct staff holding at least one slot.
    #[inline]
    pub fn rostered(&self) -> usize {
        self.weekly.len()
    }
}
