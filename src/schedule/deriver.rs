use super::types::{TariffPeriod, TransitionEvent};
use chrono::NaiveDateTime;

/// Tariff in force at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedState {
    pub is_low_tariff: bool,
    pub next_switch: Option<NaiveDateTime>,
    pub current_period: TariffPeriod,
}

/// Walk the ordered events up to `now`.
///
/// The last event at or before `now` decides the tariff (normal when there is
/// none); the first event after `now` is the next switch.
pub fn derive(events: &[TransitionEvent], now: NaiveDateTime) -> DerivedState {
    let mut current = false;
    let mut next = None;

    for event in events {
        if event.timestamp <= now {
            current = event.tariff_is_low;
        } else {
            next = Some(event.timestamp);
            break;
        }
    }

    DerivedState {
        is_low_tariff: current,
        next_switch: next,
        current_period: TariffPeriod::from_low(current),
    }
}
