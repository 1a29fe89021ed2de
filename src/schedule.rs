//! HDO switching schedule: fetch, parse and derive
//!
//! The provider publishes, per signal and day, a string of low-tariff windows.
//! This module turns that string into ordered ON/OFF events, works out which
//! tariff is active right now and when it next changes, and caches the result
//! until that change is due.

pub mod client;
pub mod deriver;
pub mod parser;
pub mod source;
pub mod types;

pub use client::ScheduleClient;
pub use deriver::{DerivedState, derive};
pub use parser::{RangeParseWarning, SignalRecord, SignalsResponse, parse_ranges, parse_schedule};
pub use source::{HttpScheduleSource, ScheduleSource};
pub use types::{ScheduleState, Signal, TariffPeriod, TransitionEvent};
