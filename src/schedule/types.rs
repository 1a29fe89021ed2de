use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Switching signal variants a meter can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Signal {
    #[default]
    #[serde(rename = "a3b4dp01")]
    A3b4dp01,
    #[serde(rename = "a3b4dp02")]
    A3b4dp02,
    #[serde(rename = "a3b4dp06")]
    A3b4dp06,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A3b4dp01 => "a3b4dp01",
            Self::A3b4dp02 => "a3b4dp02",
            Self::A3b4dp06 => "a3b4dp06",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tariff period label exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffPeriod {
    LowTariff,
    NormalTariff,
}

impl TariffPeriod {
    pub fn from_low(is_low_tariff: bool) -> Self {
        if is_low_tariff {
            Self::LowTariff
        } else {
            Self::NormalTariff
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowTariff => "low_tariff",
            Self::NormalTariff => "normal_tariff",
        }
    }
}

/// One ON/OFF edge of the low tariff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionEvent {
    pub timestamp: NaiveDateTime,
    pub tariff_is_low: bool,
}

impl TransitionEvent {
    pub fn new(timestamp: NaiveDateTime, tariff_is_low: bool) -> Self {
        Self {
            timestamp,
            tariff_is_low,
        }
    }
}

/// State handed to the host on every poll.
///
/// Only two constructors exist: [`ScheduleState::from_events`] for a parsed
/// schedule and [`ScheduleState::error`] for the fail-safe payload. Both keep
/// `current_period` in step with `is_low_tariff`, and the error state always
/// reports the low tariff with an empty schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleState {
    is_low_tariff: bool,
    next_switch: Option<NaiveDateTime>,
    current_period: TariffPeriod,
    today_switches: Vec<TransitionEvent>,
    error_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule_last_update: Option<NaiveDateTime>,
}

impl ScheduleState {
    /// Derive the state for `now` from today's ordered events
    pub fn from_events(events: Vec<TransitionEvent>, now: NaiveDateTime) -> Self {
        let derived = super::deriver::derive(&events, now);
        Self {
            is_low_tariff: derived.is_low_tariff,
            next_switch: derived.next_switch,
            current_period: derived.current_period,
            today_switches: events,
            error_mode: false,
            error_message: None,
            schedule_last_update: Some(now),
        }
    }

    /// Fail-safe state: low tariff reported active, nothing scheduled
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            is_low_tariff: true,
            next_switch: None,
            current_period: TariffPeriod::LowTariff,
            today_switches: Vec::new(),
            error_mode: true,
            error_message: Some(message.into()),
            schedule_last_update: None,
        }
    }

    pub fn is_low_tariff(&self) -> bool {
        self.is_low_tariff
    }

    pub fn next_switch(&self) -> Option<NaiveDateTime> {
        self.next_switch
    }

    pub fn current_period(&self) -> TariffPeriod {
        self.current_period
    }

    pub fn today_switches(&self) -> &[TransitionEvent] {
        &self.today_switches
    }

    pub fn is_error(&self) -> bool {
        self.error_mode
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Local time the schedule behind this state was fetched
    pub fn schedule_last_update(&self) -> Option<NaiveDateTime> {
        self.schedule_last_update
    }
}
