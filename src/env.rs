//! Environment variable names and helpers for services that derive their
//! logging setup from the environment.
//!
//! These are purely helpers; [`init_logger`](crate::init::init_logger)
//! itself never reads the environment.

/// Enables debug-level logging when set to a truthy value.
pub const BOT_LOG_DEBUG_ENV: &str = "BOT_LOG_DEBUG";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `1`, `true`, `yes` and `on` (any case) are truthy, everything else is not.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Whether [`BOT_LOG_DEBUG_ENV`] asks for debug logging.
pub fn debug_from_env() -> bool {
    is_truthy(&env_or(BOT_LOG_DEBUG_ENV, ""))
}
