use crate::event::{Caller, FieldValue, LogEvent};
use crate::formatter::Formatter;
use crate::severity::{Severity, SEVERITY_FIELD};
use chrono::Local;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, PoisonError, RwLock,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Runtime settings of a [`LineLayer`], shared so that a later
/// [`init_logger`](crate::init::init_logger) call can replace them in place.
#[derive(Clone, Debug)]
pub struct LayerSettings {
    /// Events below this severity are dropped without being rendered.
    pub min_severity: Severity,
    /// Attach file, line and function to every rendered event.
    pub capture_caller: bool,
    pub formatter: Formatter,
}

thread_local! {
    static LINE_BUF: RefCell<String> = RefCell::new(String::with_capacity(256));
}

/// `tracing_subscriber` layer that renders every event as a single line
/// with [`Formatter`] and writes it to its writer (stdout by default).
///
/// Writes are best effort: a failing writer only bumps `write_errors`, it
/// never surfaces to the code that emitted the event.
pub struct LineLayer<W = fn() -> io::Stdout> {
    settings: Arc<RwLock<LayerSettings>>,
    make_writer: W,
    /// Lines successfully written.
    pub rendered_events: Arc<AtomicU64>,
    /// Lines lost because the writer returned an error.
    pub write_errors: Arc<AtomicU64>,
}

impl LineLayer {
    /// Create a layer writing to stdout.
    pub fn new(settings: LayerSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            make_writer: io::stdout,
            rendered_events: Arc::new(AtomicU64::new(0)),
            write_errors: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<W> LineLayer<W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    /// Swap the output destination, keeping settings and counters.
    pub fn with_writer<W2>(self, make_writer: W2) -> LineLayer<W2>
    where
        W2: for<'w> MakeWriter<'w> + 'static,
    {
        LineLayer {
            settings: self.settings,
            make_writer,
            rendered_events: self.rendered_events,
            write_errors: self.write_errors,
        }
    }

    /// Handle to the live settings of this layer.
    pub fn settings_handle(&self) -> Arc<RwLock<LayerSettings>> {
        Arc::clone(&self.settings)
    }

    fn write_line(&self, meta: &tracing::Metadata<'_>, line: &str) {
        let mut writer = self.make_writer.make_writer_for(meta);
        match writer.write_all(line.as_bytes()) {
            Ok(()) => {
                self.rendered_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.write_errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl<S, W> Layer<S> for LineLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let meta = event.metadata();
        let settings = self.settings.read().unwrap_or_else(PoisonError::into_inner);

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let severity = resolve_severity(Severity::from_level(meta.level()), &mut fields);
        if severity < settings.min_severity {
            return;
        }

        let caller = if settings.capture_caller {
            meta.file().map(|file| Caller {
                file: file.to_string(),
                line: meta.line().unwrap_or(0),
                function: enclosing_function(event, &ctx),
            })
        } else {
            None
        };

        let record = LogEvent {
            timestamp: Local::now(),
            severity,
            message: message.unwrap_or_default(),
            fields,
            caller,
        };

        LINE_BUF.with(|cell| match cell.try_borrow_mut() {
            Ok(mut buf) => {
                buf.clear();
                settings.formatter.format_into(&record, &mut buf);
                self.write_line(meta, &buf);
            }
            // Re-entered from inside the writer; fall back to a fresh buffer.
            Err(_) => self.write_line(meta, &settings.formatter.format(&record)),
        });
    }
}

/// Promote an `ERROR` event tagged `severity = "fatal" | "panic"`. The tag is
/// consumed only when it promotes; otherwise it stays an ordinary field.
fn resolve_severity(base: Severity, fields: &mut BTreeMap<String, FieldValue>) -> Severity {
    if base != Severity::Error {
        return base;
    }
    let promoted = match fields.get(SEVERITY_FIELD) {
        Some(FieldValue::Str(s)) | Some(FieldValue::Debug(s)) => match s.parse::<Severity>() {
            Ok(sev @ (Severity::Fatal | Severity::Panic)) => Some(sev),
            _ => None,
        },
        _ => None,
    };
    match promoted {
        Some(sev) => {
            fields.remove(SEVERITY_FIELD);
            sev
        }
        None => base,
    }
}

/// Name of the function that emitted `event`.
///
/// The innermost span's name is used only when that span was opened in the
/// same file and module, at or above the event's line, which is the shape
/// of an `#[instrument]`ed fn logging from its own body. Otherwise this
/// falls back to the last module path segment, then the target.
///
/// A hand-made span (`info_span!("update")`) or an uninstrumented helper
/// that sits in the same module as the enclosing span still reports the
/// span's name; callsite metadata carries no function boundaries to tell
/// them apart.
fn enclosing_function<S>(event: &Event<'_>, ctx: &Context<'_, S>) -> String
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let meta = event.metadata();
    if let Some(span) = ctx.event_span(event) {
        let span_meta = span.metadata();
        let same_site = span_meta.file() == meta.file()
            && span_meta.module_path() == meta.module_path()
            && span_meta.line() <= meta.line();
        if same_site {
            return span.name().to_string();
        }
    }
    meta.module_path()
        .and_then(|path| path.rsplit("::").next())
        .unwrap_or_else(|| meta.target())
        .to_string()
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, FieldValue>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), FieldValue::Str(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), FieldValue::U64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), FieldValue::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.fields.insert(field.name().to_string(), FieldValue::Str(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), FieldValue::Debug(format!("{:?}", value)));
        }
    }
}
