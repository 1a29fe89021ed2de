use tracing::field::Empty;
use tracing::{Span, debug, error, error_span, info, trace, warn};

/// Who is logging: a component and the metering point it serves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    /// Component name (e.g. "client", "http", "coordinator")
    pub component: String,
    pub ean: Option<String>,
    pub signal: Option<String>,
    /// Portal URL, set by the HTTP source
    pub url: Option<String>,
}

impl LogContext {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            ..Self::default()
        }
    }

    pub fn with_ean(mut self, ean: &str) -> Self {
        self.ean = Some(ean.to_string());
        self
    }

    pub fn with_signal(mut self, signal: &str) -> Self {
        self.signal = Some(signal.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

/// Component logger.
///
/// Every event is emitted inside a span carrying `component`, `ean`, `signal`
/// and `url` as real tracing fields, so the JSON layer reports them as keys
/// and `EnvFilter` directives such as `[hdo{ean=859...}]` can select them.
/// The span is created at error level and stays enabled whenever any output
/// from this crate is.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
    span: Span,
}

impl StructuredLogger {
    pub fn new(context: LogContext) -> Self {
        let span = error_span!(
            "hdo",
            component = %context.component,
            ean = Empty,
            signal = Empty,
            url = Empty
        );
        if let Some(ean) = &context.ean {
            span.record("ean", ean.as_str());
        }
        if let Some(signal) = &context.signal {
            span.record("signal", signal.as_str());
        }
        if let Some(url) = &context.url {
            span.record("url", url.as_str());
        }
        Self { context, span }
    }

    /// Span the events of this logger are recorded in
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn info(&self, message: &str) {
        self.span.in_scope(|| info!("{}", message));
    }

    pub fn warn(&self, message: &str) {
        self.span.in_scope(|| warn!("{}", message));
    }

    pub fn error(&self, message: &str) {
        self.span.in_scope(|| error!("{}", message));
    }

    pub fn debug(&self, message: &str) {
        self.span.in_scope(|| debug!("{}", message));
    }

    pub fn trace(&self, message: &str) {
        self.span.in_scope(|| trace!("{}", message));
    }
}

/// Logger for a component without metering point context
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}

pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}
