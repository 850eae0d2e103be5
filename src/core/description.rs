//! Package description text handling.
//!
//! Stored descriptions are a legacy interchange format: free text in which line
//! breaks may be written as `<br>` tags (possibly entity-escaped by an earlier
//! sanitization pass) or as any mix of newline conventions. Rendering goes in
//! two stages: [`normalize_desc_text`] turns markup into plain `\n`-separated
//! text, then [`desc_to_lines`] splits it into bullet-free display lines.
//!
//! Malformed markup never causes an error. An unterminated `<br` is kept as
//! literal text.

/// Leading markers removed from each description line.
pub const BULLET_MARKERS: [char; 3] = ['-', '•', '·'];

/// Separator used by [`desc_preview`].
pub const PREVIEW_SEPARATOR: &str = " · ";

/// Converts raw description markup into plain `\n`-separated text.
///
/// - decodes `&lt;` / `&gt;` back to `<` / `>`
/// - replaces every `<br ...>` tag (case-insensitive, any attributes) with `\n`
/// - converts `\r\n` and bare `\r` to `\n`
/// - trims the whole result
///
/// # Examples
/// ```
/// use invoice_desk::core::description::normalize_desc_text;
/// assert_eq!(normalize_desc_text(Some("Line 1<br>Line 2")), "Line 1\nLine 2");
/// assert_eq!(normalize_desc_text(None), "");
/// ```
#[must_use]
pub fn normalize_desc_text(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return String::new();
    };

    let decoded = raw.replace("&lt;", "<").replace("&gt;", ">");
    let replaced = replace_break_tags(&decoded);

    replaced
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

/// Splits normalized text into display lines.
///
/// Blank lines are dropped, surrounding whitespace is trimmed, and leading
/// bullet markers (`-`, `•`, `·`) are stripped. Order is preserved and nothing
/// is deduplicated or truncated.
///
/// # Examples
/// ```
/// use invoice_desk::core::description::desc_to_lines;
/// assert_eq!(desc_to_lines(Some("- A\n- B")), vec!["A", "B"]);
/// assert!(desc_to_lines(None).is_empty());
/// ```
#[must_use]
pub fn desc_to_lines(desc: Option<&str>) -> Vec<String> {
    desc.unwrap_or_default()
        .split('\n')
        .map(strip_bullets)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes then splits raw description markup in one step.
#[must_use]
pub fn raw_desc_to_lines(raw: Option<&str>) -> Vec<String> {
    desc_to_lines(Some(&normalize_desc_text(raw)))
}

/// One-line catalog preview built from the first `max_lines` description lines.
#[must_use]
pub fn desc_preview(raw: Option<&str>, max_lines: usize) -> String {
    raw_desc_to_lines(raw)
        .iter()
        .take(max_lines)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(PREVIEW_SEPARATOR)
}

/// Escapes text for embedding in HTML markup.
///
/// This is the sanitization pass whose `&lt;` / `&gt;` output
/// [`normalize_desc_text`] reverses.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn replace_break_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if is_break_opener(tail) {
            if let Some(close) = tail[3..].find('>') {
                out.push('\n');
                rest = &tail[3 + close + 1..];
                continue;
            }
        }

        // not a tag, or unterminated: keep the '<' literally
        out.push('<');
        rest = &tail[1..];
    }

    out.push_str(rest);
    out
}

fn is_break_opener(text: &str) -> bool {
    text.get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<br"))
}

fn strip_bullets(line: &str) -> &str {
    let mut rest = line.trim();
    while let Some(stripped) = rest.strip_prefix(&BULLET_MARKERS[..]) {
        rest = stripped.trim_start();
    }
    rest
}
