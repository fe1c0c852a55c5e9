//! # availability-engine
//!
//! Timezone-aware materialization of weekly availability rules into concrete
//! bookable time intervals.
//!
//! Given a set of recurring weekly working-time rules and a set of
//! date-specific overrides, the engine produces the flat list of bookable
//! intervals within a requested `[date_from, date_to)` range, in a target
//! timezone. Overrides win at whole-day granularity: an override on a date
//! replaces every recurring interval on that date.
//!
//! ## Quick start
//!
//! ```rust
//! use availability_engine::{materialize, AvailabilityRule, TimeOfDay, WeekdaySet};
//! use chrono::{TimeZone, Utc};
//!
//! // Weekday working hours, 09:00-17:00.
//! let rules = vec![AvailabilityRule::recurring(
//!     WeekdaySet::from_indices(&[1, 2, 3, 4, 5]).unwrap(),
//!     TimeOfDay::new(9, 0),
//!     TimeOfDay::new(17, 0),
//! )];
//!
//! let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let to = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
//! let intervals = materialize("America/New_York", &rules, from, to).unwrap();
//! assert_eq!(intervals.len(), 5); // Mon-Fri of the first week of 2024
//! ```
//!
//! ## Modules
//!
//! - [`materializer`] — rules + date range → concrete intervals
//! - [`rule`] — rule data model and the wire-record validation boundary
//! - [`error`] — error types

pub mod error;
pub mod materializer;
pub mod rule;

pub use error::AvailabilityError;
pub use materializer::{materialize, Interval};
pub use rule::{AvailabilityRule, RuleRecord, TimeOfDay, WeekdaySet};
