//! Roster data: weeks of shift slots, the staff who fill them, and their leave.

/// Declare a [`Uuid`](uuid::Uuid)-backed identifier newtype.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident as $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[inline]
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Construct an identifier from a fixed integer. Mostly useful for fixtures.
            #[inline]
            pub const fn from_u128(n: u128) -> Self {
                Self(uuid::Uuid::from_u128(n))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ".{}"), self.0.simple())
            }
        }
    };
}

pub mod highlight;
pub mod leave;
pub mod slot;
pub mod staff;
pub mod week;

pub use highlight::*;
pub use leave::*;
pub use slot::*;
pub use staff::*;
pub use week::*;

/// Create a [`NaiveDate`](chrono::NaiveDate) literal, or a
/// [`NaiveDateTime`](chrono::NaiveDateTime) when a time is appended with `@ h:m`.
#[macro_export]
macro_rules! date {
    ($mo:literal/$d:literal/$yr:literal) => {
        chrono::NaiveDate::from_ymd_opt($yr, $mo, $d)
            .unwrap_or_else(|| panic!("`{}/{}/{}` is not a valid date", $mo, $d, $yr))
    };

    ($mo:literal/$d:literal/$yr:literal @ $hr:literal:$m:literal) => {
        $crate::date!($mo / $d / $yr)
            .and_hms_opt($hr, $m, 0)
            .unwrap_or_else(|| panic!("`{}:{}` is not a valid time", $hr, $m))
    };
}

/// Create a [`Vec`] of [`StaffMember`s](staff::StaffMember) for testing.
///
/// Everyone starts available for every slot on every day, with no leave.
#[macro_export]
macro_rules! staff {
    ($(
        $id:literal: $name:literal ideal $ideal:literal
    ),+ $(,)?) => {
        vec![$(
            $crate::data::staff::StaffMember {
                id: $crate::data::staff::StaffId::from_u128($id),
                name: $name.to_string(),
                ideal_shifts: $ideal,
                availability: vec![
                    $crate::data::staff::DayAvailability::default();
                    $crate::data::week::DAYS_PER_WEEK
                ],
                leave: Vec::new(),
                deleted: false,
            }
        ),+]
    };

    () => {
        Vec::<$crate::data::staff::StaffMember>::new()
    };
}
