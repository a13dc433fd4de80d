//! Flag scheduling problems on a roster week.
//!
//! # Passes
//!
//! 1. Count how many slots every staff member holds, per day and per week.
//! 1. Flag each slot on its own, taking the first problem found in this order:
//!    - [`Duplicate`](Highlight::Duplicate): rostered more than once that day
//!    - [`LeaveConflict`](Highlight::LeaveConflict): approved leave covers the day[^leave]
//!    - [`PrefRefuse`](Highlight::PrefRefuse) / [`PrefConflict`](Highlight::PrefConflict):
//!      unavailable all day / for this kind of shift
//!    - [`IdealExceeded`](Highlight::IdealExceeded): over the weekly ideal[^ideal]
//! 1. Link a late shift to an early shift worked by the same person the next
//!    day, as [`LateToEarly`](Highlight::LateToEarly), unless a closed day sits
//!    in between or a higher-[ranked](Highlight::rank) flag is already present.
//!
//! [^leave]: A day is compared at midnight against the half-open leave interval.
//! [^ideal]: Exactly meeting the ideal is not reported unless
//!     [`ConflictAnalyzer::emit_ideal_met`] is switched on.
//!
//! Analysis never fails. Slots held by someone missing from the staff list,
//! and days without availability data, simply get fewer checks.

mod carry;
mod count;
mod flag;

pub use count::ShiftCounts;

use crate::data::*;
use chrono::NaiveDate;
use serde::Serialize;
use smallvec::SmallVec;
use strum::IntoEnumIterator;

/// Computed flags for a week, laid out parallel to its days, rows and slots.
///
/// Built by [`ConflictAnalyzer::analyze`] without touching the week itself;
/// [`Flags::apply`] writes them back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    grid: Vec<Vec<SmallVec<[(SlotId, Highlight); 3]>>>,
}

impl Flags {
    /// Every slot of `week` with [`Highlight::None`].
    fn blank(week: &RosterWeek) -> Self {
        Self {
            grid: week
                .days
                .iter()
                .map(|day| {
                    day.rows
                        .iter()
                        .map(|row| {
                            row.slots
                                .iter()
                                .map(|slot| (slot.id, Highlight::None))
                                .collect()
                        })
                        .collect()
                })
                .collect(),
        }
    }

    /// Flag computed for the slot at `pos`.
    #[inline]
    pub fn get(&self, pos: SlotPos) -> Option<Highlight> {
        self.grid
            .get(pos.day)?
            .get(pos.row)?
            .get(pos.slot)
            .map(|&(_, flag)| flag)
    }

    fn set(&mut self, pos: SlotPos, flag: Highlight) {
        if let Some(cell) = self
            .grid
            .get_mut(pos.day)
            .and_then(|day| day.get_mut(pos.row))
            .and_then(|row| row.get_mut(pos.slot))
        {
            cell.1 = flag;
        }
    }

    /// Flag computed for the slot with ID `id`.
    pub fn get_by_id(&self, id: SlotId) -> Option<Highlight> {
        self.iter()
            .find_map(|(_, slot, flag)| (slot == id).then_some(flag))
    }

    /// Every computed flag with its slot's position and ID.
    pub fn iter(&self) -> impl Iterator<Item = (SlotPos, SlotId, Highlight)> + '_ {
        self.grid.iter().enumerate().flat_map(|(d, day)| {
            day.iter().enumerate().flat_map(move |(r, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(s, &(id, flag))| (SlotPos { day: d, row: r, slot: s }, id, flag))
            })
        })
    }

    /// Overwrite [`Slot::flag`] on every slot of `week` these flags were computed for.
    ///
    /// Slots are matched by position and must still carry the same ID; anything
    /// else is left untouched. Returns the number of slots written.
    pub fn apply(&self, week: &mut RosterWeek) -> usize {
        let (mut written, mut skipped) = (0, 0);
        for (pos, id, flag) in self.iter() {
            match week.slot_at_mut(pos) {
                Some(slot) if slot.id == id => {
                    slot.flag = flag;
                    written += 1;
                }
                _ => {
                    tracing::trace!(slot = %id, ?pos, "slot moved; flag not written");
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            tracing::warn!(written, skipped, "week changed shape since analysis");
        }
        written
    }

    /// How many slots carry each flag.
    pub fn summary(&self) -> FlagSummary {
        let mut counts = Highlight::iter()
            .map(|h| (h, self.iter().filter(|&(_, _, flag)| flag == h).count()))
            .collect::<Vec<_>>();
        counts.sort_by_key(|&(h, _)| h.rank());
        FlagSummary { counts }
    }

    /// Every flagged slot of `week`, described for a report.
    pub fn conflicts(&self, week: &RosterWeek) -> Vec<Conflict> {
        self.iter()
            .filter(|&(_, _, flag)| flag != Highlight::None)
            .filter_map(|(pos, id, flag)| {
                let slot = week.slot_at(pos).filter(|slot| slot.id == id)?;
                let day = week.days.get(pos.day)?;
                Some(Conflict {
                    slot: id,
                    date: week.date_of(pos.day),
                    day: day.name.clone(),
                    kind: slot.kind,
                    staff: slot.staff,
                    staff_name: slot.staff_name.clone(),
                    flag,
                    description: flag.description(),
                })
            })
            .collect()
    }
}

/// Count of slots per [`Highlight`], lowest rank first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagSummary {
    /// One entry per highlight, including zero counts.
    pub counts: Vec<(Highlight, usize)>,
}

impl FlagSummary {
    /// Slots carrying `flag`.
    pub fn count(&self, flag: Highlight) -> usize {
        self.counts
            .iter()
            .find_map(|&(h, n)| (h == flag).then_some(n))
            .unwrap_or(0)
    }

    /// Slots carrying anything other than [`Highlight::None`].
    pub fn flagged(&self) -> usize {
        self.counts
            .iter()
            .filter(|&&(h, _)| h != Highlight::None)
            .map(|&(_, n)| n)
            .sum()
    }
}

/// A flagged slot, resolved against its week for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// The flagged slot.
    pub slot: SlotId,
    /// Calendar date of the slot's day.
    pub date: Option<NaiveDate>,
    /// Display name of the slot's day.
    pub day: String,
    /// Kind of shift.
    pub kind: SlotKind,
    /// Who holds the slot.
    pub staff: Option<StaffId>,
    /// Cached display name of [`staff`](Self::staff).
    pub staff_name: Option<String>,
    /// The flag itself.
    pub flag: Highlight,
    /// [`Highlight::description`] of the flag.
    pub description: &'static str,
}

/// Computes [`Flags`] for roster weeks against a fixed staff list.
#[derive(Debug, Clone)]
pub struct ConflictAnalyzer<'s> {
    staff: StaffMap<'s>,
    emit_ideal_met: bool,
}

impl<'s> ConflictAnalyzer<'s> {
    /// Index `staff` by ID. If an ID appears twice, the first record is used.
    pub fn new(staff: &'s [StaffMember]) -> Self {
        let mut map = StaffMap::default();
        for member in staff {
            map.entry(member.id).or_insert(member);
        }
        Self {
            staff: map,
            emit_ideal_met: false,
        }
    }

    /// Report [`Highlight::IdealMet`] for staff exactly at their ideal.
    ///
    /// Off by default: meeting the ideal is currently shown as no flag at all.
    pub fn emit_ideal_met(mut self, emit: bool) -> Self {
        self.emit_ideal_met = emit;
        self
    }

    /// Compute a flag for every slot of `week`.
    #[tracing::instrument(level = "debug", skip_all, fields(week = %week.start))]
    pub fn analyze(&self, week: &RosterWeek) -> Flags {
        let counts = ShiftCounts::tally(week);
        let check = flag::SlotCheck {
            counts: &counts,
            staff: &self.staff,
            emit_ideal_met: self.emit_ideal_met,
        };

        let mut flags = Flags::blank(week);
        for (d, day) in week.days.iter().enumerate() {
            if usize::from(day.offset) != d {
                tracing::warn!(day = %day.id, offset = day.offset, position = d, "day offset does not match its position");
            }
            let date = week.date_of(d);
            for (row, slot, s) in day.slots() {
                flags.set(SlotPos { day: d, row, slot }, check.flag(d, date, s));
            }
        }

        let linked = carry::link_late_to_early(week, &mut flags);
        tracing::debug!(rostered = counts.rostered(), linked, "analysis complete");
        flags
    }

    /// Recompute every [`Slot::flag`] of `week` and hand it back.
    pub fn evaluate(&self, mut week: RosterWeek) -> RosterWeek {
        self.analyze(&week).apply(&mut week);
        week
    }
}

/// Recompute every [`Slot::flag`] of `week` against `staff`.
///
/// Shorthand for [`ConflictAnalyzer::new`] followed by [`ConflictAnalyzer::evaluate`].
pub fn evaluate(week: RosterWeek, staff: &[StaffMember]) -> RosterWeek {
    ConflictAnalyzer::new(staff).evaluate(week)
}
