//! Per-slot flag assignment.

use crate::{
    algo::count::ShiftCounts,
    data::{Highlight, Slot, SlotKind, StaffMap, StaffMember},
};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Everything needed to judge a slot in isolation.
pub(super) struct SlotCheck<'a, 's> {
    pub counts: &'a ShiftCounts,
    pub staff: &'a StaffMap<'s>,
    pub emit_ideal_met: bool,
}

impl SlotCheck<'_, '_> {
    /// Flag for `slot` on the day at position `day`, dated `date`.
    ///
    /// Checks run duplicate, leave, preference, workload; the first hit wins.
    pub fn flag(&self, day: usize, date: Option<NaiveDate>, slot: &Slot) -> Highlight {
        let Some(id) = slot.staff else {
            return Highlight::None;
        };

        if self.counts.on_day(id, day) > 1 {
            return Highlight::Duplicate;
        }

        let Some(member) = self.staff.get(&id).copied() else {
            tracing::debug!(staff = %id, slot = %slot.id, "slot held by unknown staff member");
            return Highlight::None;
        };

        if date.is_some_and(|date| member.on_leave(date)) {
            return Highlight::LeaveConflict;
        }

        if let Some(flag) = preference(member, day, slot.kind) {
            return flag;
        }

        workload(
            self.counts.weekly(id),
            member.ideal_shifts,
            self.emit_ideal_met,
        )
    }
}

/// Preference clash of `member` working `kind` on the day at `day`, if any.
fn preference(member: &StaffMember, day: usize, kind: SlotKind) -> Option<Highlight> {
    if !kind.has_preference() {
        return None;
    }
    let avail = member.availability_on(day)?;
    if avail.refuses_all() {
        Some(Highlight::PrefRefuse)
    } else if avail.allows(kind) == Some(false) {
        Some(Highlight::PrefConflict)
    } else {
        None
    }
}

/// Workload flag for someone rostered `total` times against an ideal of `ideal`.
///
/// Meeting the ideal exactly is only reported when `emit_ideal_met` is set.
fn workload(total: u32, ideal: u32, emit_ideal_met: bool) -> Highlight {
    match total.cmp(&ideal) {
        Ordering::Greater => Highlight::IdealExceeded,
        Ordering::Equal if emit_ideal_met => Highlight::IdealMet,
        Ordering::Equal | Ordering::Less => Highlight::None,
    }
}
