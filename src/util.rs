use unicode_width::UnicodeWidthChar;

/// Make a free-text comment safe for a single log line: commas and line
/// breaks are dropped, surrounding whitespace trimmed, and the result capped
/// at `max_width` terminal columns.
pub fn sanitize_comment(raw: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();

    for c in raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '\n' && *c != '\r')
    {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(c);
    }

    out.trim_end().to_string()
}
