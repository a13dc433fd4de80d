//! See [`Slot`] and [`Row`]

use crate::data::{Highlight, StaffId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{EnumIter, EnumString, IntoStaticStr};

id_type! {
    /// Code uniquely identifying a slot
    SlotId as "s"
}

/// Time-of-day category of a [`Slot`].
///
/// Days are not limited to one of each kind; a [`Row`] may carry any set of
/// kinds, which is how the extra [`SlotKind::Amelia`] column is rostered on the
/// days that need it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SlotKind {
    /// Opening shift.
    Early,
    /// Middle of the day.
    Mid,
    /// Closing shift.
    Late,
    /// Extra concurrent shift run on selected days only.
    Amelia,
}

impl SlotKind {
    /// The kinds every default day is provisioned with.
    pub const STANDARD: [SlotKind; 3] = [SlotKind::Early, SlotKind::Mid, SlotKind::Late];

    /// Whether staff record availability for this kind.
    #[inline]
    pub const fn has_preference(self) -> bool {
        !matches!(self, SlotKind::Amelia)
    }
}

/// The unit of assignment: one staff member working one kind of shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Duplicate of the slot's ID.
    pub id: SlotId,

    /// Which column of the day the slot belongs to.
    pub kind: SlotKind,

    /// Free-text start time, as the manager typed it.
    #[serde(default)]
    pub start_time: String,

    /// Staff member working the slot, if any.
    #[serde(default)]
    pub staff: Option<StaffId>,

    /// Cached display name of [`staff`](Self::staff).
    ///
    /// Only [`RosterWeek::assign`](super::RosterWeek::assign) and
    /// [`RosterWeek::refresh_staff_names`](super::RosterWeek::refresh_staff_names) write it.
    #[serde(default)]
    pub staff_name: Option<String>,

    /// Result of the last analysis. Overwritten every time; never authoritative.
    #[serde(default)]
    pub flag: Highlight,

    /// Free-text note.
    #[serde(default)]
    pub desc: String,
}

impl Slot {
    /// An unassigned slot of the given kind with a fresh ID.
    pub fn empty(kind: SlotKind) -> Self {
        Self {
            id: SlotId::random(),
            kind,
            start_time: String::new(),
            staff: None,
            staff_name: None,
            flag: Highlight::None,
            desc: String::new(),
        }
    }
}

/// One line of a day's schedule, grouping slots that render side by side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    /// Slots in display order.
    pub slots: SmallVec<[Slot; 3]>,
}

impl Row {
    /// A row holding one empty slot per kind.
    pub fn empty(kinds: &[SlotKind]) -> Self {
        Self {
            slots: kinds.iter().copied().map(Slot::empty).collect(),
        }
    }

    /// First slot of `kind`, if the row has one.
    #[inline]
    pub fn slot(&self, kind: SlotKind) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.kind == kind)
    }

    /// Mutable version of [`Row::slot`].
    #[inline]
    pub fn slot_mut(&mut self, kind: SlotKind) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_row_has_one_slot_per_kind() {
        let row = Row::empty(&SlotKind::STANDARD);
        assert_eq!(row.slots.len(), 3);
        for kind in SlotKind::STANDARD {
            let slot = row.slot(kind).unwrap();
            assert_eq!(slot.staff, None);
            assert_eq!(slot.flag, Highlight::None);
        }
        assert!(row.slot(SlotKind::Amelia).is_none());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!("late".parse::<SlotKind>().unwrap(), SlotKind::Late);
        assert_eq!(SlotKind::Amelia.to_string(), "amelia");
        assert!(!SlotKind::Amelia.has_preference());
        assert!(SlotKind::STANDARD.iter().all(|k| k.has_preference()));
    }
}
