//! Provider response shape and the time-range parser.
//!
//! A record's `casy` field looks like `"00:00-05:35; 06:30-08:55"`. Every
//! well-formed range becomes an ON event at its start and an OFF event at its
//! end; an end in hour 24 lands on midnight of the following day.

use super::types::{Signal, TransitionEvent};
use crate::error::{HdoError, Result};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Provider date format for `datum`
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Top-level response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalsResponse {
    #[serde(default)]
    pub data: Option<SignalsData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalsData {
    #[serde(default)]
    pub signals: Option<Vec<SignalRecord>>,
}

/// One day of one signal
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalRecord {
    #[serde(default)]
    pub signal: Option<String>,
    /// Weekday name, informational only
    #[serde(default)]
    pub den: Option<String>,
    #[serde(default)]
    pub datum: Option<String>,
    #[serde(default)]
    pub casy: Option<String>,
}

impl SignalsResponse {
    pub fn records(&self) -> &[SignalRecord] {
        self.data
            .as_ref()
            .and_then(|d| d.signals.as_deref())
            .unwrap_or_default()
    }
}

/// Why a single range segment was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeParseWarning {
    #[error("missing '-' separator")]
    MissingSeparator,
    #[error("invalid start time '{0}'")]
    InvalidStart(String),
    #[error("invalid end time '{0}'")]
    InvalidEnd(String),
}

/// Turn today's record for `signal` into ordered transition events.
///
/// Fails when the signal has no record dated `today` or when that record has
/// no range string. Ranges that cannot be read are skipped, so a non-empty
/// string can still produce an empty sequence.
pub fn parse_schedule(
    response: &SignalsResponse,
    signal: Signal,
    today: NaiveDate,
) -> Result<Vec<TransitionEvent>> {
    let records = response.records();
    let today_str = today.format(DATE_FORMAT).to_string();
    debug!(
        signal = signal.as_str(),
        today = %today_str,
        records = records.len(),
        "Parsing switch times"
    );

    let record = records
        .iter()
        .find(|r| {
            r.signal.as_deref() == Some(signal.as_str())
                && r.datum.as_deref().map(str::trim) == Some(today_str.as_str())
        })
        .ok_or_else(|| HdoError::signal_not_found(signal.as_str()))?;

    let ranges = record.casy.as_deref().unwrap_or_default().trim();
    if ranges.is_empty() {
        return Err(HdoError::schedule_empty(signal.as_str()));
    }

    debug!(casy = ranges, "Raw range string");
    Ok(parse_ranges(ranges, today))
}

/// Parse a `;`-separated range string, skipping malformed segments.
/// The result is sorted by timestamp; ties keep generation order.
pub fn parse_ranges(ranges: &str, today: NaiveDate) -> Vec<TransitionEvent> {
    let mut events = Vec::new();

    for segment in ranges.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        match parse_segment(segment, today) {
            Ok((on, off)) => {
                debug!(
                    segment,
                    on = %on.format("%H:%M"),
                    off = %off.format("%H:%M"),
                    "Parsed low tariff window"
                );
                events.push(TransitionEvent::new(on, true));
                events.push(TransitionEvent::new(off, false));
            }
            Err(reason) => {
                warn!(segment, %reason, "Could not parse time range");
            }
        }
    }

    // sort_by_key is stable
    events.sort_by_key(|e| e.timestamp);
    events
}

/// Parse `HH:MM-HH:MM` into its ON and OFF timestamps
pub fn parse_segment(
    segment: &str,
    today: NaiveDate,
) -> std::result::Result<(NaiveDateTime, NaiveDateTime), RangeParseWarning> {
    let (start, end) = segment
        .split_once('-')
        .ok_or(RangeParseWarning::MissingSeparator)?;
    let (start, end) = (start.trim(), end.trim());

    let on = match parse_clock(start) {
        Some((h, m)) if h < 24 => NaiveTime::from_hms_opt(h, m, 0),
        _ => None,
    }
    .map(|t| today.and_time(t))
    .ok_or_else(|| RangeParseWarning::InvalidStart(start.to_string()))?;

    let off = match parse_clock(end) {
        Some((24, _)) => today.checked_add_days(Days::new(1)).map(|d| d.and_time(NaiveTime::MIN)),
        Some((h, m)) => NaiveTime::from_hms_opt(h, m, 0).map(|t| today.and_time(t)),
        None => None,
    }
    .ok_or_else(|| RangeParseWarning::InvalidEnd(end.to_string()))?;

    Ok((on, off))
}

/// `HH:MM` with numeric parts and minutes below 60; hour range is checked by the caller
fn parse_clock(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.split_once(':')?;
    let h: u32 = h.trim().parse().ok()?;
    let m: u32 = m.trim().parse().ok()?;
    (m < 60 && h <= 24).then_some((h, m))
}
