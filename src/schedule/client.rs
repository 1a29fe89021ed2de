use super::parser::parse_schedule;
use super::source::{HttpScheduleSource, ScheduleSource};
use super::types::{ScheduleState, Signal};
use crate::config::HdoConfig;
use crate::error::Result;
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Last state handed out plus the timestamp that gates the next fetch.
/// Always replaced as a whole.
#[derive(Debug, Clone)]
struct CacheEntry {
    state: ScheduleState,
    next_switch: Option<NaiveDateTime>,
}

/// Schedule client with a freshness-gated cache
pub struct ScheduleClient<S: ScheduleSource = HttpScheduleSource> {
    ean: String,
    signal: Signal,
    timezone: Tz,
    source: S,
    cache: Option<CacheEntry>,
    logger: StructuredLogger,
}

impl ScheduleClient<HttpScheduleSource> {
    /// Client talking to the provider portal
    pub fn new(config: &HdoConfig, timezone: Tz) -> Self {
        Self::with_source(
            config.ean.trim(),
            config.signal,
            timezone,
            HttpScheduleSource::new(config),
        )
    }
}

impl<S: ScheduleSource> ScheduleClient<S> {
    pub fn with_source(ean: &str, signal: Signal, timezone: Tz, source: S) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("client")
                .with_ean(ean)
                .with_signal(signal.as_str()),
        );
        Self {
            ean: ean.to_string(),
            signal,
            timezone,
            source,
            cache: None,
            logger,
        }
    }

    pub fn ean(&self) -> &str {
        &self.ean
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// State currently held in the cache, if any
    pub fn cached(&self) -> Option<&ScheduleState> {
        self.cache.as_ref().map(|entry| &entry.state)
    }

    /// Provider-local wall clock
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    /// Current schedule state; never fails
    pub async fn get_data(&mut self) -> ScheduleState {
        let now = self.now();
        self.get_data_at(now).await
    }

    /// Current schedule state as of `now`.
    ///
    /// A cached state is returned untouched while its next switch is still
    /// ahead. Otherwise the schedule is fetched again and the cache replaced
    /// with the outcome, which on failure is the fail-safe error state.
    pub async fn get_data_at(&mut self, now: NaiveDateTime) -> ScheduleState {
        if let Some(entry) = &self.cache
            && let Some(gate) = entry.next_switch
            && gate >= now
        {
            self.logger.trace("Serving cached schedule");
            return entry.state.clone();
        }

        let state = match self.fetch_state(now).await {
            Ok(state) => {
                self.logger.debug(&format!(
                    "Current state: {}, next switch: {}",
                    if state.is_low_tariff() {
                        "LOW TARIFF"
                    } else {
                        "NORMAL TARIFF"
                    },
                    state
                        .next_switch()
                        .map(|t| t.format("%H:%M").to_string())
                        .unwrap_or_else(|| "None".to_string())
                ));
                state
            }
            Err(err) => {
                if err.is_transport() {
                    self.logger
                        .error(&format!("Schedule portal unreachable: {}", err));
                } else {
                    self.logger.error(&format!("Unusable schedule response: {}", err));
                }
                self.logger.warn(&format!(
                    "Returning error state with low tariff: {}",
                    err
                ));
                ScheduleState::error(err.to_string())
            }
        };

        self.cache = Some(CacheEntry {
            next_switch: state.next_switch(),
            state: state.clone(),
        });
        state
    }

    async fn fetch_state(&mut self, now: NaiveDateTime) -> Result<ScheduleState> {
        let response = self.source.fetch(&self.ean).await?;
        let events = parse_schedule(&response, self.signal, now.date())?;
        if events.is_empty() {
            self.logger
                .warn("No usable time ranges today, assuming normal tariff all day");
        }
        Ok(ScheduleState::from_events(events, now))
    }

    /// Release the network session
    pub async fn shutdown(&mut self) {
        self.logger.info("Closing schedule client");
        self.source.close().await;
    }
}
