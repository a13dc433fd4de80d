//! # roster
//!
//! Shift roster model and conflict flagging.
//!
//! A [`RosterWeek`](data::RosterWeek) is handed to a
//! [`ConflictAnalyzer`](algo::ConflictAnalyzer) together with the staff list,
//! and comes back with a [`Highlight`](data::Highlight) on every slot.

#![deny(
    clippy::undocumented_unsafe_blocks,
    clippy::missing_safety_doc,
    reason = "multi-person projects should document dangers"
)]
#![warn(missing_docs)]
#![cfg_attr(
    not(any(test, debug_assertions)),
    deny(
        clippy::missing_panics_doc,
        clippy::panic,
        clippy::unimplemented,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "prefer errors over panicking"
    )
)]
#![cfg_attr(
    not(any(test, debug_assertions)),
    forbid(clippy::todo, reason = "production code should not use `todo`")
)]

pub mod algo;
pub mod data;
pub mod config;
pub mod logging;
pub mod provision;
pub mod store;

pub use algo::{ConflictAnalyzer, Flags, evaluate};
pub use config::RosterConfig;
pub use store::{JsonDirStore, MemoryStore, RosterStore, week_or_blank, week_or_provision};
