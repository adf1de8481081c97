use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Urgency of a log event, totally ordered from `Trace` to `Panic`.
///
/// `Fatal` and `Panic` have no native `tracing` level; they are carried on
/// `ERROR` events through the reserved [`SEVERITY_FIELD`] and produced by the
/// [`fatal!`](crate::fatal) and [`log_panic!`](crate::log_panic) macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

/// Field name that promotes an `ERROR` event to `Fatal` or `Panic`.
pub const SEVERITY_FIELD: &str = "severity";

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
        }
    }

    /// Upper-cased name as it appears inside the `[LEVEL]` bracket.
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Panic => "PANIC",
        }
    }

    /// Map a facade level. `tracing` tops out at `ERROR`.
    pub fn from_level(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::ERROR => Severity::Error,
        }
    }

    /// Facade filter letting through this severity and everything above it.
    pub fn level_filter(self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;
        match self {
            Severity::Trace => LevelFilter::TRACE,
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warn => LevelFilter::WARN,
            Severity::Error | Severity::Fatal | Severity::Panic => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown severity: '{0}'")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" | "err" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "panic" => Ok(Severity::Panic),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}
