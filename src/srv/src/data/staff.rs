//! See [`StaffMember`]

use crate::data::{LeaveRequest, SlotKind};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

id_type! {
    /// Code uniquely identifying a staff member
    StaffId as "u"
}

/// Which shifts a staff member is willing to work on one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayAvailability {
    /// Available for the opening shift.
    pub early: bool,
    /// Available for the middle shift.
    pub mid: bool,
    /// Available for the closing shift.
    pub late: bool,
}

impl Default for DayAvailability {
    #[inline]
    fn default() -> Self {
        Self {
            early: true,
            mid: true,
            late: true,
        }
    }
}

impl DayAvailability {
    /// Availability for `kind`, or [`None`] if the kind carries no preference.
    #[inline]
    pub const fn allows(&self, kind: SlotKind) -> Option<bool> {
        match kind {
            SlotKind::Early => Some(self.early),
            SlotKind::Mid => Some(self.mid),
            SlotKind::Late => Some(self.late),
            SlotKind::Amelia => None,
        }
    }

    /// Unavailable for every shift that day.
    #[inline]
    pub const fn refuses_all(&self) -> bool {
        !(self.early || self.mid || self.late)
    }
}

/// A person who can be rostered onto slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Duplicate of the staff member's ID.
    pub id: StaffId,

    /// Display name for representing the staff member on the roster.
    /// Can be changed without changing the ID.
    pub name: String,

    /// Target number of shifts per week.
    pub ideal_shifts: u32,

    /// One entry per day offset of the roster week.
    #[serde(default)]
    pub availability: Vec<DayAvailability>,

    /// Every leave request ever lodged, whatever its status.
    #[serde(default)]
    pub leave: Vec<LeaveRequest>,

    /// Soft-deleted staff stay on file but are never handed to the analyzer.
    #[serde(default)]
    pub deleted: bool,
}

impl StaffMember {
    /// Availability for the day at `offset`, or [`None`] if none was recorded.
    #[inline]
    pub fn availability_on(&self, offset: usize) -> Option<&DayAvailability> {
        self.availability.get(offset)
    }

    /// Whether approved leave covers `date`.
    pub fn on_leave(&self, date: NaiveDate) -> bool {
        self.leave.iter().any(|req| req.blocks(date))
    }
}

/// A dictionary associating staff IDs with borrowed staff records.
pub type StaffMap<'a> = FxHashMap<StaffId, &'a StaffMember>;
