use super::parser::SignalsResponse;
use crate::config::HdoConfig;
use crate::error::{HdoError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Header set the portal expects from its own web frontend
pub const REQUEST_HEADERS: [(&str, &str); 12] = [
    (
        "User-Agent",
        "Mozilla/5.0 (X11; Linux x86_64; rv:141.0) Gecko/20100101 Firefox/141.0",
    ),
    ("Accept", "application/json, text/plain, */*"),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Accept-Encoding", "gzip, deflate, br, zstd"),
    ("Content-Type", "application/json"),
    ("Origin", "https://dip.cezdistribuce.cz"),
    ("Connection", "keep-alive"),
    (
        "Referer",
        "https://dip.cezdistribuce.cz/irj/portal/anonymous/casy-spinani/",
    ),
    ("Sec-Fetch-Dest", "empty"),
    ("Sec-Fetch-Mode", "cors"),
    ("Sec-Fetch-Site", "same-origin"),
    ("Priority", "u=0"),
];

/// Where the raw day schedule comes from
#[async_trait::async_trait]
pub trait ScheduleSource: Send {
    /// Fetch the signals payload for a metering point
    async fn fetch(&mut self, ean: &str) -> Result<SignalsResponse>;

    /// Release any held connection resources
    async fn close(&mut self) {}
}

/// Provider portal over HTTPS
pub struct HttpScheduleSource {
    url: String,
    timeout: Duration,
    session: Option<reqwest::Client>,
    logger: StructuredLogger,
}

impl HttpScheduleSource {
    pub fn new(config: &HdoConfig) -> Self {
        let url = format!(
            "{}?path={}",
            config.base_url.trim_end_matches('?'),
            config.endpoint
        );
        let logger = get_logger_with_context(
            LogContext::new("http").with_url(&url),
        );
        Self {
            url,
            timeout: Duration::from_secs(config.timeout_secs),
            session: None,
            logger,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a connection pool is currently held
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Reuse the pooled client, building it on first use
    fn session(&mut self) -> Result<reqwest::Client> {
        if let Some(client) = &self.session {
            return Ok(client.clone());
        }
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(request_headers()?)
            .build()?;
        self.logger.debug("Created HTTP session");
        self.session = Some(client.clone());
        Ok(client)
    }
}

/// [`REQUEST_HEADERS`] as a header map
pub fn request_headers() -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(REQUEST_HEADERS.len());
    for (name, value) in REQUEST_HEADERS {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HdoError::config(format!("Invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_static(value);
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait::async_trait]
impl ScheduleSource for HttpScheduleSource {
    async fn fetch(&mut self, ean: &str) -> Result<SignalsResponse> {
        let client = self.session()?;
        let body = serde_json::to_string(&serde_json::json!({ "ean": ean }))?;

        self.logger.debug("Requesting switch times");
        let resp = client.post(&self.url).body(body).send().await?;

        if resp.status() != StatusCode::OK {
            self.logger.error(&format!(
                "API request failed with status {}",
                resp.status().as_u16()
            ));
            return Err(HdoError::transport(format!(
                "API request failed with status {}",
                resp.status().as_u16()
            )));
        }

        Ok(resp.json::<SignalsResponse>().await?)
    }

    async fn close(&mut self) {
        if self.session.take().is_some() {
            self.logger.debug("Closed HTTP session");
        }
    }
}
