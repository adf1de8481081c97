use crate::severity::Severity;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fmt;

/// Call site of a log emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
    pub function: String,
}

/// Closed set of renderable field values.
///
/// `Display` is the default textual representation used in the `{k=v}`
/// block: strings unquoted, numbers and booleans as-is, anything else by its
/// `Debug` text captured at record time.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Debug(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) | FieldValue::Debug(s) => f.write_str(s),
            FieldValue::I64(v) => write!(f, "{}", v),
            FieldValue::U64(v) => write!(f, "{}", v),
            FieldValue::F64(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::I64(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::I64(v.into())
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::U64(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::F64(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

/// One log event as handed to the [`Formatter`](crate::formatter::Formatter).
///
/// Fields are kept in a `BTreeMap`, so they always iterate in ascending
/// byte-wise key order no matter how they were inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub message: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub caller: Option<Caller>,
}

impl LogEvent {
    pub fn new(timestamp: DateTime<Local>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            severity,
            message: message.into(),
            fields: BTreeMap::new(),
            caller: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_caller(mut self, file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        self.caller = Some(Caller {
            file: file.into(),
            line,
            function: function.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_representation() {
        assert_eq!(FieldValue::from("hello").to_string(), "hello");
        assert_eq!(FieldValue::from(-456i64).to_string(), "-456");
        assert_eq!(FieldValue::from(1.5f64).to_string(), "1.5");
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(FieldValue::Debug("Some(3)".into()).to_string(), "Some(3)");
    }

    #[test]
    fn fields_iterate_sorted() {
        let ev = LogEvent::new(Local::now(), Severity::Info, "m")
            .with_field("user_id", 1)
            .with_field("chat_id", 2)
            .with_field("command", "hello");
        let keys: Vec<_> = ev.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["chat_id", "command", "user_id"]);
    }
}
