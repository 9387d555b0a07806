pub const ELLIPSIS: &str = "...";

const LINE_BREAKS: [char; 5] = ['\n', '\r', '\u{0085}', '\u{2028}', '\u{2029}'];

/// Menu title for a piece of source text: first line of the trimmed text,
/// shortened to `max_len` characters with a trailing ellipsis.
///
/// `max_len` below the ellipsis length is raised to it.
pub fn trim_title(source: &str, max_len: usize) -> String {
    let trimmed = source.trim();
    let first_line = match trimmed.find(LINE_BREAKS) {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };

    let ellipsis_len = ELLIPSIS.chars().count();
    let max_len = max_len.max(ellipsis_len);
    if first_line.chars().count() <= max_len {
        return first_line.to_string();
    }

    let mut out: String = first_line.chars().take(max_len - ellipsis_len).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Leading `max_len` characters of `source`, untouched otherwise.
pub fn clip_tooltip(source: &str, max_len: usize) -> String {
    source.chars().take(max_len).collect()
}

pub fn numbered_label(title: &str, list_number: usize, mark_with_number: bool) -> String {
    if mark_with_number {
        format!("{list_number}. {title}")
    } else {
        title.to_string()
    }
}
