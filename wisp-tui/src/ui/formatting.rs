use chrono::{DateTime, Utc};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use super::theme::ThemeColors;

/// Format timestamp for display
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// Human-relative time, the way the web client shows it ("5m ago").
pub fn format_relative(timestamp: &DateTime<Utc>) -> String {
    let seconds = (Utc::now() - *timestamp).num_seconds();
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else if seconds < 86_400 * 30 {
        format!("{}d ago", seconds / 86_400)
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Wrap body text into styled lines with a two-space indent.
pub fn wrap_content(content: &str, max_width: usize, theme: &ThemeColors) -> Vec<Line<'static>> {
    let mut lines = vec![];
    let wrap_width = max_width.saturating_sub(4).max(10);

    for line in content.lines() {
        if line.is_empty() {
            lines.push(Line::from(""));
            continue;
        }
        for wrapped in textwrap::wrap(line, wrap_width) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(wrapped.to_string(), Style::default().fg(theme.text)),
            ]));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(""));
    }

    lines
}

/// Single-line preview, truncated by display width so wide glyphs don't
/// overflow the cell budget.
pub fn truncate(text: &str, max_width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    let flat = text.replace('\n', " ");
    if UnicodeWidthStr::width(flat.as_str()) <= max_width {
        return flat;
    }

    let budget = max_width.saturating_sub(1);
    let mut width = 0;
    let mut out = String::new();
    for ch in flat.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push('…');
    out
}
