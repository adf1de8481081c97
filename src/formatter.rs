use crate::color::{paint, Color, RESET};
use crate::event::LogEvent;
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// `YYYY-MM-DD HH:MM:SS`, 24-hour clock, second precision.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Settings a [`Formatter`] is built from. Immutable once handed over.
///
/// **Fields**
/// - `timestamp_format`: chrono `strftime` pattern applied to the event time.
/// - `colors_enabled`: wrap styled segments in ANSI color codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub timestamp_format: String,
    pub colors_enabled: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            colors_enabled: true,
        }
    }
}

/// Error returned when a [`FormatterConfig`] cannot be used.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid timestamp format: {0:?}")]
    InvalidTimestampFormat(String),
}

/// Renders a [`LogEvent`] into one newline-terminated line:
///
/// ```text
/// <timestamp> [LEVEL] <file>:<line> <function>(): <message> {k1=v1 k2=v2}
/// ```
///
/// The caller segment is present only when the event carries caller info,
/// the braces only when it has fields. Fields are always printed in
/// ascending key order, so the same event renders to the same bytes.
#[derive(Clone, Debug)]
pub struct Formatter {
    config: FormatterConfig,
}

impl Formatter {
    /// Build a formatter, validating the timestamp pattern once up front.
    ///
    /// **Returns**
    /// - `Err(ConfigError::InvalidTimestampFormat)` if the pattern is empty,
    ///   contains an unknown `%` specifier, or uses a specifier chrono can
    ///   parse with but not print (such as `%#z`).
    pub fn new(config: FormatterConfig) -> Result<Self, ConfigError> {
        let pattern = config.timestamp_format.as_str();
        let unknown = StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
        let unprintable = write!(String::new(), "{}", Local::now().format(pattern)).is_err();
        if pattern.is_empty() || unknown || unprintable {
            return Err(ConfigError::InvalidTimestampFormat(config.timestamp_format));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Render `event` into a freshly allocated string.
    pub fn format(&self, event: &LogEvent) -> String {
        let mut buf = String::with_capacity(128);
        self.format_into(event, &mut buf);
        buf
    }

    /// Append the rendered line for `event` to `buf`. Existing contents of
    /// `buf` are left untouched.
    pub fn format_into(&self, event: &LogEvent, buf: &mut String) {
        let colors = self.config.colors_enabled;

        // Written in place; the pattern was trial-rendered in `new`, so this
        // cannot fail.
        if colors {
            buf.push_str(Color::Gray.sgr());
        }
        let _ = write!(buf, "{}", event.timestamp.format(&self.config.timestamp_format));
        if colors {
            buf.push_str(RESET);
        }

        buf.push_str(" [");
        paint(buf, event.severity.label(), Color::for_severity(event.severity), colors);
        buf.push(']');

        if let Some(caller) = &event.caller {
            buf.push(' ');
            paint(buf, base_name(&caller.file), Color::Gray, colors);
            let _ = write!(buf, ":{} ", caller.line);
            paint(buf, base_name(&caller.function), Color::Cyan, colors);
            buf.push_str("():");
        }

        if !event.message.is_empty() {
            buf.push(' ');
            paint(buf, &event.message, Color::White, colors);
        }

        if !event.fields.is_empty() {
            buf.push(' ');
            paint(buf, "{", Color::Gray, colors);
            for (i, (key, value)) in event.fields.iter().enumerate() {
                if i > 0 {
                    buf.push(' ');
                }
                paint(buf, key, Color::BrightCyan, colors);
                let _ = write!(buf, "={}", value);
            }
            paint(buf, "}", Color::Gray, colors);
        }

        buf.push('\n');
    }
}

/// Last path component, accepting both `/` and `\` separators.
fn base_name(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path)
}
