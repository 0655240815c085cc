//! Display helpers shared by the formatters.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Escape text for HTML and XML content and attribute values.
///
/// Characters XML 1.0 does not allow (C0 controls other than tab, newline
/// and carriage return, plus U+FFFE and U+FFFF) become U+FFFD.
pub(crate) fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => out.push(char::REPLACEMENT_CHARACTER),
            _ => out.push(c),
        }
    }
    out
}

/// Format a datetime for display.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format a duration for display.
pub(crate) fn format_duration(d: &Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, d.subsec_millis())
    } else {
        format!("{}ms", d.as_millis())
    }
}

/// Format a ratio in `[0, 1]` as a percentage.
pub(crate) fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape_markup("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_markup("plain"), "plain");
    }

    #[test]
    fn test_escape_markup_replaces_control_characters() {
        assert_eq!(
            escape_markup("\u{1b}[31mred\u{1b}[0m\u{0}"),
            "\u{fffd}[31mred\u{fffd}[0m\u{fffd}"
        );
        assert_eq!(escape_markup("a\tb\r\nc"), "a\tb\r\nc");
        assert_eq!(escape_markup("\u{ffff}\u{fffe}"), "\u{fffd}\u{fffd}");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(&Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(&Duration::from_millis(1500)), "1.500s");
        assert_eq!(format_duration(&Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(&Duration::from_secs(3661)), "1h 1m 1s");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.7), "70.00%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
