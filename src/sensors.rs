//! Sensor views rendered by the host
//!
//! Two binary sensors share one device per metering point: the tariff sensor
//! is on while the low tariff is active, the error sensor is on while the
//! client is serving the fail-safe state.

use crate::schedule::{ScheduleState, Signal, TariffPeriod};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value, json};

pub const MANUFACTURER: &str = "ČEZ Distribuce";
pub const MODEL: &str = "HDO Signal";
pub const SAFETY_MODE: &str = "low_tariff_activated";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Device both sensors are attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub suggested_area: &'static str,
}

impl DeviceInfo {
    pub fn for_ean(ean: &str) -> Self {
        Self {
            identifier: ean.to_string(),
            name: format!("CEZ HDO {}", ean),
            manufacturer: MANUFACTURER,
            model: MODEL,
            suggested_area: "Utility",
        }
    }
}

/// Rendered state of one sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub unique_id: String,
    pub name: String,
    pub device_class: &'static str,
    pub icon: &'static str,
    pub is_on: Option<bool>,
    pub attributes: Map<String, Value>,
}

/// Low tariff binary sensor
#[derive(Debug, Clone)]
pub struct TariffSensor {
    ean: String,
    signal: Signal,
}

impl TariffSensor {
    pub fn new(ean: &str, signal: Signal) -> Self {
        Self {
            ean: ean.to_string(),
            signal,
        }
    }

    pub fn unique_id(&self) -> String {
        format!("cez_hdo_{}", self.ean)
    }

    pub fn device(&self) -> DeviceInfo {
        DeviceInfo::for_ean(&self.ean)
    }

    /// Render against the latest state; `None` before the first update
    pub fn render(&self, data: Option<&ScheduleState>, now: NaiveDateTime) -> SensorReading {
        let is_on = data.map(ScheduleState::is_low_tariff);
        SensorReading {
            unique_id: self.unique_id(),
            name: format!("CEZ HDO {}", self.ean),
            device_class: "power",
            icon: if is_on == Some(true) {
                "mdi:flash"
            } else {
                "mdi:flash-outline"
            },
            is_on,
            attributes: data
                .map(|state| self.attributes(state, now))
                .unwrap_or_default(),
        }
    }

    fn attributes(&self, state: &ScheduleState, now: NaiveDateTime) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert("ean".into(), json!(self.ean));
        attrs.insert("signal".into(), json!(self.signal.as_str()));
        attrs.insert("current_period".into(), json!(state.current_period()));
        attrs.insert(
            "next_switch".into(),
            json!(
                state
                    .next_switch()
                    .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            ),
        );

        if state.is_error() {
            attrs.insert("error_mode".into(), json!(true));
            attrs.insert(
                "error_message".into(),
                json!(state.error_message().unwrap_or("Unknown error")),
            );
            attrs.insert("safety_mode".into(), json!(SAFETY_MODE));
        } else {
            attrs.insert("error_mode".into(), json!(false));
        }

        if let Some(updated) = state.schedule_last_update() {
            attrs.insert(
                "schedule_last_update".into(),
                json!(updated.format(TIMESTAMP_FORMAT).to_string()),
            );
            attrs.insert(
                "schedule_age_minutes".into(),
                json!((now - updated).num_minutes()),
            );
        }

        let switches = state.today_switches();
        if !switches.is_empty() {
            attrs.insert("today_switches_count".into(), json!(switches.len()));
            let listed: Vec<Value> = switches
                .iter()
                .map(|s| {
                    json!({
                        "time": s.timestamp.format("%H:%M").to_string(),
                        "state": TariffPeriod::from_low(s.tariff_is_low).as_str(),
                    })
                })
                .collect();
            attrs.insert("switches_today".into(), Value::Array(listed));
        }

        attrs
    }
}

/// Problem sensor mirroring error mode
#[derive(Debug, Clone)]
pub struct ErrorSensor {
    ean: String,
    signal: Signal,
}

impl ErrorSensor {
    pub fn new(ean: &str, signal: Signal) -> Self {
        Self {
            ean: ean.to_string(),
            signal,
        }
    }

    pub fn unique_id(&self) -> String {
        format!("cez_hdo_error_{}", self.ean)
    }

    pub fn device(&self) -> DeviceInfo {
        DeviceInfo::for_ean(&self.ean)
    }

    pub fn render(&self, data: Option<&ScheduleState>, now: NaiveDateTime) -> SensorReading {
        let mut attributes = Map::new();
        if let Some(state) = data {
            attributes.insert("ean".into(), json!(self.ean));
            attributes.insert("signal".into(), json!(self.signal.as_str()));
            if state.is_error() {
                attributes.insert(
                    "error_message".into(),
                    json!(state.error_message().unwrap_or("Unknown error")),
                );
                attributes.insert("safety_mode".into(), json!(SAFETY_MODE));
                attributes.insert(
                    "last_error_time".into(),
                    json!(now.format(TIMESTAMP_FORMAT).to_string()),
                );
            }
        }

        SensorReading {
            unique_id: self.unique_id(),
            name: format!("CEZ HDO Error {}", self.ean),
            device_class: "problem",
            icon: "mdi:alert-circle",
            is_on: data.map(ScheduleState::is_error),
            attributes,
        }
    }
}
