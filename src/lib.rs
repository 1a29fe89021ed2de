//! # CEZ HDO - low/high tariff schedule for CEZ Distribuce meters
//!
//! Polls the CEZ Distribuce switch-times portal for the day's HDO (ripple
//! control) schedule of a metering point, parses the low-tariff windows and
//! reports whether the low tariff is active right now and when it next
//! switches.
//!
//! ## Architecture
//!
//! - `schedule`: response parsing, state derivation and the caching client
//! - `coordinator`: fixed-interval refresh loop fanning state out to observers
//! - `sensors`: binary sensor views rendered from the current state
//! - `config`: YAML configuration and validation
//! - `logging`: structured logging and tracing
//! - `error`: error taxonomy

pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod schedule;
pub mod sensors;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::UpdateCoordinator;
pub use error::{HdoError, Result};
pub use schedule::{ScheduleClient, ScheduleState, Signal};
