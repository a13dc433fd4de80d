//! Late-to-early linkage between consecutive days.

use crate::{
    algo::Flags,
    data::{Highlight, RosterWeek, SlotKind, SlotPos},
};

/// Mark every late shift followed by an early shift for the same person on
/// the next day. Pairs touching a closed day are skipped, and neither slot is
/// touched when either already carries a flag that outranks
/// [`Highlight::LateToEarly`].
///
/// Returns the number of pairs linked.
pub(super) fn link_late_to_early(week: &RosterWeek, flags: &mut Flags) -> usize {
    let mut linked = 0;

    for (d, pair) in week.days.windows(2).enumerate() {
        let [today, tomorrow] = pair else { continue };
        if today.closed || tomorrow.closed {
            continue;
        }

        for (row, slot, late) in today.slots() {
            if late.kind != SlotKind::Late {
                continue;
            }
            let Some(staff) = late.staff else { continue };
            let late_pos = SlotPos { day: d, row, slot };
            if !flags
                .get(late_pos)
                .is_some_and(Highlight::yields_to_late_to_early)
            {
                continue;
            }

            for (row, slot, early) in tomorrow.slots() {
                if early.kind != SlotKind::Early || early.staff != Some(staff) {
                    continue;
                }
                let early_pos = SlotPos {
                    day: d + 1,
                    row,
                    slot,
                };
                if !flags
                    .get(early_pos)
                    .is_some_and(Highlight::yields_to_late_to_early)
                {
                    continue;
                }
                flags.set(late_pos, Highlight::LateToEarly);
                flags.set(early_pos, Highlight::LateToEarly);
                linked += 1;
            }
        }
    }

    linked
}
