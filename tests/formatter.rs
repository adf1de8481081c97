use bot_line_log::{strip_ansi, FieldValue, Formatter, FormatterConfig, LogEvent, Severity};
use chrono::{DateTime, Local, TimeZone};

fn fixed_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single().unwrap()
}

fn formatter(colors_enabled: bool) -> Formatter {
    Formatter::new(FormatterConfig {
        colors_enabled,
        ..FormatterConfig::default()
    })
    .unwrap()
}

fn hello_event() -> LogEvent {
    LogEvent::new(fixed_time(), Severity::Info, "Processing hello command")
        .with_field("user_id", 123)
        .with_field("chat_id", -456)
}

#[test]
fn plain_line_without_caller() {
    assert_eq!(
        formatter(false).format(&hello_event()),
        "2024-01-15 10:30:00 [INFO] Processing hello command {chat_id=-456 user_id=123}\n"
    );
}

#[test]
fn caller_segment_follows_level() {
    let event = hello_event().with_caller("hello.go", 42, "hello");
    assert_eq!(
        formatter(false).format(&event),
        "2024-01-15 10:30:00 [INFO] hello.go:42 hello(): Processing hello command {chat_id=-456 user_id=123}\n"
    );
}

#[test]
fn caller_paths_render_as_base_names() {
    let event = LogEvent::new(fixed_time(), Severity::Warn, "slow reply")
        .with_caller("/srv/bot/src/modules/hello.rs", 7, "bot::modules/hello");
    assert_eq!(
        formatter(false).format(&event),
        "2024-01-15 10:30:00 [WARN] hello.rs:7 hello(): slow reply\n"
    );
}

#[test]
fn colored_line_uses_palette() {
    let event = hello_event().with_caller("hello.go", 42, "hello");
    let expected = concat!(
        "\x1b[90m2024-01-15 10:30:00\x1b[0m ",
        "[\x1b[94mINFO\x1b[0m] ",
        "\x1b[90mhello.go\x1b[0m:42 \x1b[36mhello\x1b[0m(): ",
        "\x1b[37mProcessing hello command\x1b[0m ",
        "\x1b[90m{\x1b[0m\x1b[96mchat_id\x1b[0m=-456 \x1b[96muser_id\x1b[0m=123\x1b[90m}\x1b[0m\n",
    );
    assert_eq!(formatter(true).format(&event), expected);
}

#[test]
fn color_toggle_keeps_visible_text() {
    for severity in [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Panic,
    ] {
        let event = LogEvent::new(fixed_time(), severity, "msg")
            .with_field("k", "v")
            .with_caller("a.rs", 1, "f");
        let plain = formatter(false).format(&event);
        let colored = formatter(true).format(&event);

        assert!(!plain.contains('\x1b'));
        assert!(colored.contains('\x1b'));
        assert_eq!(strip_ansi(&colored), plain);
    }
}

#[test]
fn level_colors() {
    let cases = [
        (Severity::Debug, "\x1b[90mDEBUG\x1b[0m"),
        (Severity::Warn, "\x1b[33mWARN\x1b[0m"),
        (Severity::Error, "\x1b[31mERROR\x1b[0m"),
        (Severity::Fatal, "\x1b[31mFATAL\x1b[0m"),
        (Severity::Panic, "\x1b[31mPANIC\x1b[0m"),
    ];
    for (severity, tag) in cases {
        let line = formatter(true).format(&LogEvent::new(fixed_time(), severity, "m"));
        assert!(line.contains(&format!("[{tag}]")), "{line:?}");
    }
}

#[test]
fn unmapped_level_renders_white() {
    let event = LogEvent::new(fixed_time(), Severity::Trace, "deep detail");
    assert_eq!(
        formatter(false).format(&event),
        "2024-01-15 10:30:00 [TRACE] deep detail\n"
    );
    assert!(formatter(true).format(&event).contains("[\x1b[37mTRACE\x1b[0m]"));
}

#[test]
fn rendering_is_deterministic() {
    let event = hello_event().with_caller("hello.go", 42, "hello");
    let f = formatter(true);
    assert_eq!(f.format(&event), f.format(&event));
}

#[test]
fn field_insertion_order_is_irrelevant() {
    let a = LogEvent::new(fixed_time(), Severity::Info, "m")
        .with_field("user_id", 1)
        .with_field("command", "hello")
        .with_field("chat_id", 2)
        .with_field("Zeta", true);
    let b = LogEvent::new(fixed_time(), Severity::Info, "m")
        .with_field("Zeta", true)
        .with_field("chat_id", 2)
        .with_field("user_id", 1)
        .with_field("command", "hello");

    let f = formatter(false);
    assert_eq!(f.format(&a), f.format(&b));
    assert!(f.format(&a).ends_with("{Zeta=true chat_id=2 command=hello user_id=1}\n"));
}

#[test]
fn absent_caller_leaves_no_gap() {
    let line = formatter(false).format(&hello_event());
    assert!(!line.contains("():"));
    assert!(!line.contains("  "));
}

#[test]
fn empty_fields_omit_block() {
    let event = LogEvent::new(fixed_time(), Severity::Error, "send failed");
    let line = formatter(false).format(&event);
    assert_eq!(line, "2024-01-15 10:30:00 [ERROR] send failed\n");
    assert!(!formatter(true).format(&event).contains('{'));
}

#[test]
fn empty_message_is_skipped_cleanly() {
    let bare = LogEvent::new(fixed_time(), Severity::Info, "").with_field("user_id", 1);
    let line = formatter(false).format(&bare);
    assert_eq!(line, "2024-01-15 10:30:00 [INFO] {user_id=1}\n");
    assert!(!line.contains("  "));

    let with_caller = bare.with_caller("hello.rs", 12, "hello");
    let line = formatter(false).format(&with_caller);
    assert_eq!(line, "2024-01-15 10:30:00 [INFO] hello.rs:12 hello(): {user_id=1}\n");
    assert!(!line.contains("  "));

    let colored = formatter(true).format(&with_caller);
    assert_eq!(strip_ansi(&colored), line);
}

#[test]
fn value_kinds_use_default_representation() {
    let event = LogEvent::new(fixed_time(), Severity::Info, "m")
        .with_field("f", 0.25)
        .with_field("s", "two words")
        .with_field("u", 7u64)
        .with_field("d", FieldValue::Debug("[1, 2]".to_string()));
    assert!(formatter(false)
        .format(&event)
        .ends_with("{d=[1, 2] f=0.25 s=two words u=7}\n"));
}

#[test]
fn format_into_appends_to_existing_buffer() {
    let f = formatter(false);
    let mut buf = String::from("previous\n");
    f.format_into(&hello_event(), &mut buf);
    f.format_into(&hello_event(), &mut buf);

    let lines: Vec<_> = buf.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "previous");
    assert_eq!(lines[1], lines[2]);
    assert_eq!(buf, format!("previous\n{0}{0}", f.format(&hello_event())));
}

#[test]
fn custom_timestamp_pattern() {
    let f = Formatter::new(FormatterConfig {
        timestamp_format: "%d/%m %H:%M".to_string(),
        colors_enabled: false,
    })
    .unwrap();
    let line = f.format(&LogEvent::new(fixed_time(), Severity::Info, "m"));
    assert_eq!(line, "15/01 10:30 [INFO] m\n");
}
