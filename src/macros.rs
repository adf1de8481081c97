/// Log at `Fatal` severity, then exit the process with status 1.
///
/// Takes fields and a message like `tracing::error!`, optionally preceded
/// by `target:`. The `parent:` and `name:` forms are not supported.
///
/// ```ignore
/// fatal!(token_len = 0, "bot token missing");
/// fatal!(target: "bot::startup", "bot token missing");
/// ```
#[macro_export]
macro_rules! fatal {
    (target: $target:expr, $($arg:tt)+) => {{
        $crate::__tracing::error!(target: $target, severity = "fatal", $($arg)+);
        ::std::process::exit(1)
    }};
    ($($arg:tt)+) => {{
        $crate::__tracing::error!(severity = "fatal", $($arg)+);
        ::std::process::exit(1)
    }};
}

/// Log at `Panic` severity, then panic with the same message.
///
/// Takes format arguments only; attach fields with a preceding event if
/// they are needed.
#[macro_export]
macro_rules! log_panic {
    ($($arg:tt)+) => {{
        let message = ::std::format!($($arg)+);
        $crate::__tracing::error!(severity = "panic", "{}", message);
        ::std::panic!("{}", message)
    }};
}
