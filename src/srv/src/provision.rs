//! Creating empty weeks, and locating weeks relative to the epoch.

use crate::{
    config::RosterConfig,
    data::{DAYS_PER_WEEK, DayId, RosterDay, RosterWeek, Row, SlotKind, WeekId},
};
use chrono::{Days, NaiveDate};

/// First day of the week `offset` weeks after `epoch`. Negative offsets count backwards.
pub fn week_start(epoch: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs().checked_mul(DAYS_PER_WEEK as u64)?);
    if offset < 0 {
        epoch.checked_sub_days(days)
    } else {
        epoch.checked_add_days(days)
    }
}

/// Offset from `epoch` of the week containing `date`, rounded down.
pub fn week_offset(epoch: NaiveDate, date: NaiveDate) -> i64 {
    (date - epoch).num_days().div_euclid(DAYS_PER_WEEK as i64)
}

impl RosterConfig {
    /// First day of the week containing `date`.
    pub fn week_containing(&self, date: NaiveDate) -> Option<NaiveDate> {
        week_start(self.epoch, week_offset(self.epoch, date))
    }
}

impl RosterWeek {
    /// A blank week starting on `start`, laid out from `config`.
    ///
    /// Every day gets [`RosterConfig::rows_per_day`] empty rows of its
    /// template's kinds. Nothing is assigned, closed, or live.
    pub fn provision(start: NaiveDate, config: &RosterConfig) -> Self {
        let days = (0..DAYS_PER_WEEK)
            .map(|offset| {
                let (name, colour, kinds): (String, String, &[SlotKind]) = match config.days.get(offset) {
                    Some(t) => (t.name.clone(), t.colour.clone(), t.kinds.as_slice()),
                    None => (format!("Day {}", offset + 1), String::new(), &SlotKind::STANDARD),
                };
                RosterDay {
                    id: DayId::random(),
                    name,
                    colour,
                    offset: offset as u8,
                    closed: false,
                    rows: std::iter::repeat_with(|| Row::empty(kinds))
                        .take(config.rows_per_day)
                        .collect(),
                }
            })
            .collect();

        tracing::debug!(%start, rows = config.rows_per_day, "provisioned week");
        Self {
            id: WeekId::random(),
            start,
            live: false,
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::Highlight, date};

    #[test]
    fn test_week_start() {
        let epoch = date!(1/1/2019);
        assert_eq!(week_start(epoch, 0), Some(epoch));
        assert_eq!(week_start(epoch, 1), Some(date!(1/8/2019)));
        assert_eq!(week_start(epoch, -1), Some(date!(12/25/2018)));
        assert_eq!(week_start(epoch, 52), Some(date!(12/31/2019)));
        assert_eq!(week_start(epoch, i64::MAX), None);
    }

    #[test]
    fn test_week_offset_rounds_down() {
        let epoch = date!(1/1/2019);
        assert_eq!(week_offset(epoch, epoch), 0);
        assert_eq!(week_offset(epoch, date!(1/7/2019)), 0);
        assert_eq!(week_offset(epoch, date!(1/8/2019)), 1);
        assert_eq!(week_offset(epoch, date!(12/31/2018)), -1);
        assert_eq!(week_offset(epoch, date!(12/25/2018)), -1);
        assert_eq!(week_offset(epoch, date!(12/24/2018)), -2);
    }

    #[test]
    fn test_week_containing() {
        let config = RosterConfig::default();
        assert_eq!(
            config.week_containing(date!(10/17/2026)),
            Some(date!(10/13/2026))
        );
        assert_eq!(
            config.week_containing(date!(10/13/2026)),
            Some(date!(10/13/2026))
        );
    }

    #[test]
    fn test_provision_layout() {
        let config = RosterConfig::default();
        let week = RosterWeek::provision(date!(1/8/2019), &config);

        assert_eq!(week.start, date!(1/8/2019));
        assert!(!week.live);
        assert_eq!(week.days.len(), DAYS_PER_WEEK);
        for (i, day) in week.days.iter().enumerate() {
            assert_eq!(usize::from(day.offset), i);
            assert_eq!(day.name, config.days[i].name);
            assert_eq!(day.colour, config.days[i].colour);
            assert!(!day.closed);
            assert_eq!(day.rows.len(), config.rows_per_day);
        }
        assert!(week.slots().all(|(_, slot)| slot.staff.is_none()
            && slot.staff_name.is_none()
            && slot.flag == Highlight::None));
        assert_eq!(week.slots().count(), DAYS_PER_WEEK * 6 * 3);
    }

    #[test]
    fn test_provision_uses_fresh_ids() {
        let config = RosterConfig::default();
        let a = RosterWeek::provision(date!(1/1/2019), &config);
        let b = RosterWeek::provision(date!(1/1/2019), &config);
        assert_ne!(a.id, b.id);

        let mut ids = a.slots().map(|(_, slot)| slot.id).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), a.slots().count());
    }

    #[test]
    fn test_provision_per_day_kinds() {
        let mut config = RosterConfig::default();
        config.rows_per_day = 2;
        config.days[3].kinds = vec![SlotKind::Early, SlotKind::Mid, SlotKind::Late, SlotKind::Amelia];
        let week = RosterWeek::provision(date!(1/1/2019), &config);
        assert!(week.days[3].rows[1].slot(SlotKind::Amelia).is_some());
        assert!(week.days[2].rows[1].slot(SlotKind::Amelia).is_none());
    }
}
