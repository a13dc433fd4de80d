//! See [`Highlight`]

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// Diagnostic tag written onto every [`Slot`](super::Slot) by the analyzer.
///
/// Exactly one highlight applies to a slot after analysis. The declaration
/// order below carries no meaning; which flag may overwrite which is decided
/// by [`Highlight::rank`] and nothing else.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Highlight {
    /// Nothing to report.
    #[default]
    None,

    /// Staff member is exactly at their ideal weekly shift count.
    IdealMet,

    /// Staff member is over their ideal weekly shift count.
    IdealExceeded,

    /// Staff member asked not to work this kind of slot on this day.
    PrefConflict,

    /// Staff member closes one day and opens the next.
    LateToEarly,

    /// Staff member asked not to work at all on this day.
    PrefRefuse,

    /// Staff member holds more than one slot on this day.
    Duplicate,

    /// Staff member has approved leave covering this day.
    LeaveConflict,
}

/// Override ranking, lowest first.
///
/// A flag may only be replaced by the late-to-early pass when its rank is at
/// most that of [`Highlight::LateToEarly`].
pub const RANKING: [Highlight; 8] = [
    Highlight::None,
    Highlight::IdealMet,
    Highlight::IdealExceeded,
    Highlight::PrefConflict,
    Highlight::LateToEarly,
    Highlight::PrefRefuse,
    Highlight::Duplicate,
    Highlight::LeaveConflict,
];

/// Colour used for slots without a highlight.
pub const DEFAULT_COLOUR: &str = "#ffffff";

impl Highlight {
    /// Position of `self` in [`RANKING`].
    pub const fn rank(self) -> u8 {
        let mut i = 0;
        while i < RANKING.len() {
            if RANKING[i] as u8 == self as u8 {
                return i as u8;
            }
            i += 1;
        }
        // every variant is listed in `RANKING`
        0
    }

    /// Whether this flag may be replaced by [`Highlight::LateToEarly`].
    #[inline]
    pub const fn yields_to_late_to_early(self) -> bool {
        self.rank() <= Self::LateToEarly.rank()
    }

    /// Display colour for the roster grid.
    pub const fn colour(self) -> &'static str {
        match self {
            Self::None => DEFAULT_COLOUR,
            Self::IdealMet => "#c6efce",
            Self::IdealExceeded => "#ffd8a8",
            Self::PrefConflict => "#fff2a8",
            Self::LateToEarly => "#cfe2ff",
            Self::PrefRefuse => "#f8b4b4",
            Self::Duplicate => "#d9b3ff",
            Self::LeaveConflict => "#ff8c8c",
        }
    }

    /// Human-readable explanation shown alongside the colour.
    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "",
            Self::IdealMet => "Staff member has reached their ideal number of shifts",
            Self::IdealExceeded => "Staff member is rostered above their ideal number of shifts",
            Self::PrefConflict => "Staff member prefers not to work this shift",
            Self::LateToEarly => "Staff member works a late shift followed by an early shift",
            Self::PrefRefuse => "Staff member prefers not to work on this day",
            Self::Duplicate => "Staff member is rostered more than once on this day",
            Self::LeaveConflict => "Staff member is on approved leave",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_ranking_lists_every_flag_once() {
        for flag in Highlight::iter() {
            assert_eq!(
                RANKING.iter().filter(|&&h| h == flag).count(),
                1,
                "{flag} should appear exactly once in the ranking"
            );
        }
    }

    #[test]
    fn test_rank_follows_ranking_table() {
        for (i, flag) in RANKING.into_iter().enumerate() {
            assert_eq!(usize::from(flag.rank()), i);
        }
    }

    #[test]
    fn test_late_to_early_boundary() {
        let yielding = RANKING
            .into_iter()
            .filter(|h| h.yields_to_late_to_early())
            .collect::<Vec<_>>();
        assert_eq!(
            yielding,
            [
                Highlight::None,
                Highlight::IdealMet,
                Highlight::IdealExceeded,
                Highlight::PrefConflict,
                Highlight::LateToEarly,
            ]
        );
    }

    #[test]
    fn test_none_uses_default_colour() {
        assert_eq!(Highlight::None.colour(), DEFAULT_COLOUR);
        assert_eq!(Highlight::default(), Highlight::None);
    }

    #[test]
    fn test_flags_have_distinct_colours_and_descriptions() {
        let flags = Highlight::iter()
            .filter(|&h| h != Highlight::None)
            .collect::<Vec<_>>();
        for (i, a) in flags.iter().enumerate() {
            assert!(!a.description().is_empty(), "{a} needs a description");
            for b in &flags[i + 1..] {
                assert_ne!(a.colour(), b.colour(), "{a} and {b} share a colour");
            }
        }
    }

    #[test]
    fn test_serialized_name() {
        assert_eq!(
            serde_json::to_string(&Highlight::LateToEarly).unwrap(),
            "\"late_to_early\""
        );
        assert_eq!(Highlight::PrefRefuse.to_string(), "pref_refuse");
    }
}
