//! See [`LeaveRequest`]

use chrono::prelude::*;
use serde::{Deserialize, Serialize, de::Visitor};

id_type! {
    /// Code uniquely identifying a leave request
    LeaveId as "l"
}

/// Approval state of a [`LeaveRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    /// Signed off by a manager; the only status that blocks rostering.
    Approved,
    /// Awaiting a decision.
    #[default]
    Pending,
    /// Turned down.
    Denied,
}

/// A half-open span of local calendar time, `[start, end)`.
///
/// Times are naive on purpose: leave is compared against calendar days of the
/// roster, not against instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LeaveInterval {
    /// First moment covered.
    pub start: NaiveDateTime,

    /// First moment no longer covered.
    pub end: NaiveDateTime,
}

/// Accepts `{ "start": .., "end": .. }`, `[start, end]` or `"start..end"`.
///
/// ```
/// # use roster::data::LeaveInterval;
/// let leave: LeaveInterval =
///     serde_json::from_str(r#""2025-03-04T00:00:00..2025-03-06T00:00:00""#).unwrap();
/// assert_eq!(leave.end - leave.start, chrono::TimeDelta::days(2));
/// ```
impl<'de> Deserialize<'de> for LeaveInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct LeaveIntervalVisitor;
        use serde::de::Error;

        impl<'de> Visitor<'de> for LeaveIntervalVisitor {
            type Value = LeaveInterval;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a leave interval as a map, a pair, or `start..end`")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let start = seq
                    .next_element::<NaiveDateTime>()?
                    .ok_or_else(|| Error::invalid_length(0, &self))?;
                let end = seq
                    .next_element::<NaiveDateTime>()?
                    .ok_or_else(|| Error::invalid_length(1, &self))?;
                Ok(LeaveInterval { start, end })
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                #[derive(Deserialize)]
                #[serde(field_identifier, rename_all = "lowercase")]
                enum Field {
                    Start,
                    End,
                }

                let mut start = None;
                let mut end = None;
                while let Some(key) = map.next_key::<Field>()? {
                    match key {
                        Field::Start if start.is_some() => {
                            return Err(Error::duplicate_field("start"));
                        }
                        Field::Start => start = Some(map.next_value()?),
                        Field::End if end.is_some() => {
                            return Err(Error::duplicate_field("end"));
                        }
                        Field::End => end = Some(map.next_value()?),
                    }
                }
                let start = start.ok_or_else(|| Error::missing_field("start"))?;
                let end = end.ok_or_else(|| Error::missing_field("end"))?;
                Ok(LeaveInterval { start, end })
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                let (start, end) = v
                    .split_once("..")
                    .ok_or_else(|| Error::invalid_length(1, &self))?;
                let start = start.trim().parse().map_err(Error::custom)?;
                let end = end.trim().parse().map_err(Error::custom)?;
                Ok(LeaveInterval { start, end })
            }
        }

        deserializer
            .deserialize_any(LeaveIntervalVisitor)
            .and_then(|interval| {
                if interval.start <= interval.end {
                    Ok(interval)
                } else {
                    Err(Error::invalid_value(
                        serde::de::Unexpected::Other("time-reversed interval"),
                        &LeaveIntervalVisitor,
                    ))
                }
            })
    }
}

impl std::ops::RangeBounds<NaiveDateTime> for LeaveInterval {
    fn start_bound(&self) -> std::ops::Bound<&NaiveDateTime> {
        std::ops::Bound::Included(&self.start)
    }

    fn end_bound(&self) -> std::ops::Bound<&NaiveDateTime> {
        std::ops::Bound::Excluded(&self.end)
    }
}

impl LeaveInterval {
    /// Whether the calendar day `date` (taken at midnight) falls inside the interval.
    #[inline]
    pub fn covers_day(&self, date: NaiveDate) -> bool {
        std::ops::RangeBounds::contains(self, &date.and_time(NaiveTime::MIN))
    }
}

/// A staff member's request for time off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Duplicate of the request's ID.
    pub id: LeaveId,

    /// When the request was lodged.
    pub created: DateTime<Utc>,

    /// The time being requested off.
    pub interval: LeaveInterval,

    /// Free-text reason given by the staff member.
    #[serde(default)]
    pub reason: String,

    /// Only [`LeaveStatus::Approved`] requests affect the roster.
    #[serde(default)]
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Whether this request stops its owner from working on `date`.
    #[inline]
    pub fn blocks(&self, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && self.interval.covers_day(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date;

    fn leave(status: LeaveStatus, start: NaiveDateTime, end: NaiveDateTime) -> LeaveRequest {
        LeaveRequest {
            id: LeaveId::from_u128(1),
            created: Utc::now(),
            interval: LeaveInterval { start, end },
            reason: String::new(),
            status,
        }
    }

    #[test]
    fn test_interval_is_half_open() {
        let interval = LeaveInterval {
            start: date!(3/4/2025 @ 0:00),
            end: date!(3/6/2025 @ 0:00),
        };
        assert!(!interval.covers_day(date!(3/3/2025)));
        assert!(interval.covers_day(date!(3/4/2025)), "start is included");
        assert!(interval.covers_day(date!(3/5/2025)));
        assert!(!interval.covers_day(date!(3/6/2025)), "end is excluded");
    }

    #[test]
    fn test_interval_starting_midday_misses_that_day() {
        let interval = LeaveInterval {
            start: date!(3/4/2025 @ 9:00),
            end: date!(3/6/2025 @ 0:00),
        };
        assert!(
            !interval.covers_day(date!(3/4/2025)),
            "a day is compared at midnight, before the leave begins"
        );
        assert!(interval.covers_day(date!(3/5/2025)));
    }

    #[test]
    fn test_only_approved_leave_blocks() {
        let (start, end) = (date!(3/4/2025 @ 0:00), date!(3/5/2025 @ 0:00));
        assert!(leave(LeaveStatus::Approved, start, end).blocks(date!(3/4/2025)));
        assert!(!leave(LeaveStatus::Pending, start, end).blocks(date!(3/4/2025)));
        assert!(!leave(LeaveStatus::Denied, start, end).blocks(date!(3/4/2025)));
    }

    #[test]
    fn test_interval_deserialize_forms() {
        let expect = LeaveInterval {
            start: date!(3/4/2025 @ 0:00),
            end: date!(3/6/2025 @ 12:30),
        };
        let from_map: LeaveInterval = serde_json::from_str(
            r#"{ "start": "2025-03-04T00:00:00", "end": "2025-03-06T12:30:00" }"#,
        )
        .unwrap();
        let from_seq: LeaveInterval =
            serde_json::from_str(r#"["2025-03-04T00:00:00", "2025-03-06T12:30:00"]"#).unwrap();
        let from_str: LeaveInterval =
            serde_json::from_str(r#""2025-03-04T00:00:00..2025-03-06T12:30:00""#).unwrap();
        assert_eq!(from_map, expect);
        assert_eq!(from_seq, expect);
        assert_eq!(from_str, expect);
    }

    #[test]
    fn test_interval_rejects_reversed() {
        let res = serde_json::from_str::<LeaveInterval>(
            r#"{ "start": "2025-03-06T00:00:00", "end": "2025-03-04T00:00:00" }"#,
        );
        assert!(res.is_err(), "a time-reversed interval should not deserialize");
    }
}
