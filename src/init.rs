use crate::formatter::{ConfigError, Formatter, FormatterConfig};
use crate::layer::{LayerSettings, LineLayer};
use crate::severity::Severity;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, Registry};

/// Process-wide logging configuration.
///
/// **Fields**
/// - `min_severity`: events below this level are filtered out by the
///   facade and never reach the formatter.
/// - `capture_caller`: attach file, line and function to each line.
/// - `formatter`: settings for the installed [`Formatter`].
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub min_severity: Severity,
    pub capture_caller: bool,
    pub formatter: FormatterConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_severity: Severity::Info,
            capture_caller: true,
            formatter: FormatterConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Configuration used by [`init_logger`]: `Debug` when `debug` is set,
    /// `Info` otherwise, everything else at its default.
    pub fn for_debug(debug: bool) -> Self {
        Self {
            min_severity: if debug { Severity::Debug } else { Severity::Info },
            ..Self::default()
        }
    }
}

/// Error type returned by [`init_logger`] and [`init_logger_with_config`].
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("another global subscriber is already installed: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to reload level filter: {0}")]
    Reload(#[from] reload::Error),
}

/// Handle to the installed logging configuration.
///
/// Exactly one exists per process, created by the first successful
/// [`init_logger_with_config`] call.
pub struct LoggingState {
    settings: Arc<RwLock<LayerSettings>>,
    level: reload::Handle<LevelFilter, Registry>,
    rendered_events: Arc<AtomicU64>,
    write_errors: Arc<AtomicU64>,
}

impl LoggingState {
    pub fn min_severity(&self) -> Severity {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).min_severity
    }

    pub fn capture_caller(&self) -> bool {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).capture_caller
    }

    /// Copy of the formatter currently rendering lines.
    pub fn formatter(&self) -> Formatter {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).formatter.clone()
    }

    /// Lines written to stdout so far.
    pub fn rendered_events(&self) -> u64 {
        self.rendered_events.load(Ordering::Relaxed)
    }

    /// Lines lost to stdout write failures so far.
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    fn apply(&self, settings: LayerSettings) -> Result<(), InitError> {
        self.level.reload(settings.min_severity.level_filter())?;
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }
}

static STATE: OnceLock<LoggingState> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// The installed logging state, or `None` before the first init.
pub fn logging_state() -> Option<&'static LoggingState> {
    STATE.get()
}

/// Install the line formatter as the global `tracing` subscriber.
///
/// **Parameters**
/// - `config`: [`LoggerConfig`] with level, caller capture and formatter
///   settings.
///
/// **Effects**
///
/// The first call builds a [`Registry`] with a reloadable [`LevelFilter`]
/// and a stdout [`LineLayer`], and sets it as the global default. Later
/// calls keep that subscriber and swap in the new settings, so the last
/// call wins.
///
/// **Returns**
/// - `Err(InitError::Config)` if the timestamp pattern is invalid. Nothing is
///   installed or changed in that case.
/// - `Err(InitError::SetGlobalDefault)` if some other subscriber already
///   owns the global slot.
pub fn init_logger_with_config(config: LoggerConfig) -> Result<&'static LoggingState, InitError> {
    let settings = LayerSettings {
        min_severity: config.min_severity,
        capture_caller: config.capture_caller,
        formatter: Formatter::new(config.formatter)?,
    };

    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(state) = STATE.get() {
        state.apply(settings)?;
        return Ok(state);
    }

    let (filter, level) = reload::Layer::new(settings.min_severity.level_filter());
    let layer = LineLayer::new(settings);
    let state = LoggingState {
        settings: layer.settings_handle(),
        level,
        rendered_events: Arc::clone(&layer.rendered_events),
        write_errors: Arc::clone(&layer.write_errors),
    };

    let subscriber = Registry::default().with(filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(STATE.get_or_init(|| state))
}

/// Initialize logging for the process.
///
/// Sets the minimum severity to `Debug` when `debug` is true and `Info`
/// otherwise, enables caller capture, and installs a formatter with
/// `YYYY-MM-DD HH:MM:SS` timestamps and colors on. Call it once at startup
/// before anything logs.
pub fn init_logger(debug: bool) -> Result<&'static LoggingState, InitError> {
    init_logger_with_config(LoggerConfig::for_debug(debug))
}
