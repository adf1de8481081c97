pub mod color;
pub mod env;
pub mod event;
pub mod formatter;
pub mod init;
pub mod layer;
pub mod severity;

mod macros;

#[doc(hidden)]
pub use tracing as __tracing;

pub use color::strip_ansi;
pub use event::{Caller, FieldValue, LogEvent};
pub use formatter::{ConfigError, Formatter, FormatterConfig};
pub use init::{init_logger, init_logger_with_config, logging_state, InitError, LoggerConfig, LoggingState};
pub use layer::{LayerSettings, LineLayer};
pub use severity::Severity;
