use super::*;

pub const DEFAULT_BASE_URL: &str = "https://dip.cezdistribuce.cz/irj/portal/anonymous/casy-spinani";
pub const DEFAULT_ENDPOINT: &str = "switch-times/signals";

impl Default for HdoConfig {
    fn default() -> Self {
        Self {
            ean: String::new(),
            signal: Signal::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/cez_hdo.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hdo: HdoConfig::default(),
            logging: LoggingConfig::default(),
            scan_interval_secs: 30,
            timezone: "Europe/Prague".to_string(),
        }
    }
}
