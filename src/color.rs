//! ANSI palette used by the line formatter.

use crate::severity::Severity;

/// The handful of 16-color SGR foregrounds the formatter emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Bright black, rendered as dim gray on most terminals.
    Gray,
    Blue,
    Yellow,
    Red,
    White,
    Cyan,
    BrightCyan,
}

pub const RESET: &str = "\x1b[0m";

impl Color {
    pub const fn sgr(self) -> &'static str {
        match self {
            Color::Gray => "\x1b[90m",
            Color::Blue => "\x1b[94m",
            Color::Yellow => "\x1b[33m",
            Color::Red => "\x1b[31m",
            Color::White => "\x1b[37m",
            Color::Cyan => "\x1b[36m",
            Color::BrightCyan => "\x1b[96m",
        }
    }

    /// Severity to display color. `Trace` has no entry and falls back to
    /// plain white like any other unmapped level.
    pub const fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Debug => Color::Gray,
            Severity::Info => Color::Blue,
            Severity::Warn => Color::Yellow,
            Severity::Error | Severity::Fatal | Severity::Panic => Color::Red,
            _ => Color::White,
        }
    }
}

/// Append `text` to `buf`, wrapped in `color` and a reset when `enabled`.
pub fn paint(buf: &mut String, text: &str, color: Color, enabled: bool) {
    if enabled {
        buf.push_str(color.sgr());
        buf.push_str(text);
        buf.push_str(RESET);
    } else {
        buf.push_str(text);
    }
}

/// Remove SGR escape sequences (`ESC [ ... m`) from `input`.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_table() {
        assert_eq!(Color::for_severity(Severity::Debug), Color::Gray);
        assert_eq!(Color::for_severity(Severity::Info), Color::Blue);
        assert_eq!(Color::for_severity(Severity::Warn), Color::Yellow);
        assert_eq!(Color::for_severity(Severity::Error), Color::Red);
        assert_eq!(Color::for_severity(Severity::Fatal), Color::Red);
        assert_eq!(Color::for_severity(Severity::Panic), Color::Red);
        assert_eq!(Color::for_severity(Severity::Trace), Color::White);
    }

    #[test]
    fn paint_respects_toggle() {
        let mut on = String::new();
        paint(&mut on, "x", Color::Red, true);
        assert_eq!(on, "\x1b[31mx\x1b[0m");

        let mut off = String::new();
        paint(&mut off, "x", Color::Red, false);
        assert_eq!(off, "x");
    }

    #[test]
    fn strip_removes_only_escapes() {
        let s = format!("{}a{} b [c]", Color::BrightCyan.sgr(), RESET);
        assert_eq!(strip_ansi(&s), "a b [c]");
    }
}
