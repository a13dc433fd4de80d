//! See [`RosterWeek`]

use crate::data::{Row, Slot, SlotId, SlotKind, StaffId, StaffMember};
use chrono::{Days, NaiveDate};
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

id_type! {
    /// Code uniquely identifying a roster week
    WeekId as "w"
}

id_type! {
    /// Code uniquely identifying a roster day
    DayId as "d"
}

/// Number of days in a roster week.
pub const DAYS_PER_WEEK: usize = 7;

/// Where a slot sits inside a [`RosterWeek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotPos {
    /// Index into [`RosterWeek::days`].
    pub day: usize,
    /// Index into [`RosterDay::rows`].
    pub row: usize,
    /// Index into [`Row::slots`].
    pub slot: usize,
}

/// Error from editing a roster.
#[derive(Debug, Error, Diagnostic)]
pub enum RosterError {
    /// No slot in the week has this ID.
    #[error("slot {0} is not part of this week")]
    #[diagnostic(help("the week may have been reprovisioned; reload it and try again"))]
    SlotNotFound(SlotId),

    /// No day in the week has this ID.
    #[error("day {0} is not part of this week")]
    DayNotFound(DayId),
}

/// One calendar day of a roster week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDay {
    /// Duplicate of the day's ID.
    pub id: DayId,

    /// Display name, e.g. "Tuesday".
    pub name: String,

    /// Display colour of the day's block.
    pub colour: String,

    /// Position within the week. Must equal the day's index in [`RosterWeek::days`].
    pub offset: u8,

    /// Nothing should be rostered on a closed day.
    #[serde(default)]
    pub closed: bool,

    /// Schedule lines, in display order.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl RosterDay {
    /// Grow the day with empty rows of `kinds`, or drop rows from the end, until it has `count` rows.
    pub fn set_row_count(&mut self, count: usize, kinds: &[SlotKind]) {
        if count <= self.rows.len() {
            self.rows.truncate(count);
        } else {
            let missing = count - self.rows.len();
            self.rows
                .extend(std::iter::repeat_with(|| Row::empty(kinds)).take(missing));
        }
    }

    /// Every slot of the day with its `(row, slot)` indices.
    pub fn slots(&self) -> impl Iterator<Item = (usize, usize, &Slot)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.slots
                .iter()
                .enumerate()
                .map(move |(s, slot)| (r, s, slot))
        })
    }
}

/// One scheduling period: seven consecutive days from [`start`](Self::start).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterWeek {
    /// Duplicate of the week's ID.
    pub id: WeekId,

    /// Calendar date of the first day.
    pub start: NaiveDate,

    /// Whether the week has been published to staff.
    #[serde(default)]
    pub live: bool,

    /// The days of the week, by offset.
    pub days: Vec<RosterDay>,
}

impl RosterWeek {
    /// Calendar date of the day at `offset`.
    #[inline]
    pub fn date_of(&self, offset: usize) -> Option<NaiveDate> {
        self.start.checked_add_days(Days::new(offset as u64))
    }

    /// Every slot of the week, tagged with its position.
    pub fn slots(&self) -> impl Iterator<Item = (SlotPos, &Slot)> {
        self.days.iter().enumerate().flat_map(|(d, day)| {
            day.slots()
                .map(move |(row, slot, s)| (SlotPos { day: d, row, slot }, s))
        })
    }

    /// Slot at `pos`.
    #[inline]
    pub fn slot_at(&self, pos: SlotPos) -> Option<&Slot> {
        self.days.get(pos.day)?.rows.get(pos.row)?.slots.get(pos.slot)
    }

    /// Mutable version of [`RosterWeek::slot_at`].
    #[inline]
    pub fn slot_at_mut(&mut self, pos: SlotPos) -> Option<&mut Slot> {
        self.days
            .get_mut(pos.day)?
            .rows
            .get_mut(pos.row)?
            .slots
            .get_mut(pos.slot)
    }

    /// Position of the slot with ID `id`.
    pub fn position_of(&self, id: SlotId) -> Option<SlotPos> {
        self.slots()
            .find_map(|(pos, slot)| (slot.id == id).then_some(pos))
    }

    /// Find a slot by ID.
    pub fn find_slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots()
            .find_map(|(_, slot)| (slot.id == id).then_some(slot))
    }

    /// Mutable version of [`RosterWeek::find_slot`].
    pub fn find_slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.days
            .iter_mut()
            .flat_map(|day| day.rows.iter_mut())
            .flat_map(|row| row.slots.iter_mut())
            .find(|slot| slot.id == id)
    }

    /// Find a day by ID.
    pub fn find_day(&self, id: DayId) -> Option<&RosterDay> {
        self.days.iter().find(|day| day.id == id)
    }

    /// Mutable version of [`RosterWeek::find_day`].
    pub fn find_day_mut(&mut self, id: DayId) -> Result<&mut RosterDay, RosterError> {
        self.days
            .iter_mut()
            .find(|day| day.id == id)
            .ok_or(RosterError::DayNotFound(id))
    }

    /// Number of slots in the whole week held by `staff`.
    pub fn shift_count(&self, staff: StaffId) -> usize {
        self.slots()
            .filter(|(_, slot)| slot.staff == Some(staff))
            .count()
    }

    /// Put `staff` on the slot with ID `slot`, or clear it with [`None`].
    ///
    /// Keeps the cached [`Slot::staff_name`] in step. The slot's flag is left
    /// alone until the next analysis.
    pub fn assign(&mut self, slot: SlotId, staff: Option<&StaffMember>) -> Result<(), RosterError> {
        let target = self
            .find_slot_mut(slot)
            .ok_or(RosterError::SlotNotFound(slot))?;
        target.staff = staff.map(|s| s.id);
        target.staff_name = staff.map(|s| s.name.clone());
        Ok(())
    }

    /// Re-derive every cached staff name from `staff`.
    ///
    /// Slots held by someone missing from `staff` keep whatever name they had.
    pub fn refresh_staff_names(&mut self, staff: &[StaffMember]) {
        let names = staff
            .iter()
            .map(|s| (s.id, s.name.as_str()))
            .collect::<FxHashMap<_, _>>();

        for slot in self
            .days
            .iter_mut()
            .flat_map(|day| day.rows.iter_mut())
            .flat_map(|row| row.slots.iter_mut())
        {
            match slot.staff {
                Some(id) => {
                    if let Some(name) = names.get(&id) {
                        slot.staff_name = Some((*name).to_string());
                    }
                }
                None => slot.staff_name = None,
            }
        }
    }
}
