/// Lexical context of the scanner while walking SQL text.
#[derive(Clone)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn pair_at(bytes: &[u8], idx: usize, first: u8, second: u8) -> bool {
    matches!(bytes.get(idx..idx + 2), Some([a, b]) if *a == first && *b == second)
}

pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    pair_at(bytes, idx, b'-', b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    pair_at(bytes, idx, b'/', b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    pair_at(bytes, idx, b'*', b'/')
}

/// Digits immediately following `start`, with the index one past the last digit.
pub(super) fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let len = bytes
        .get(start..)?
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if len == 0 {
        return None;
    }
    let end = start + len;
    std::str::from_utf8(&bytes[start..end])
        .ok()
        .map(|digits| (end, digits))
}

/// Recognize an opening `$tag$` at `start`; returns the tag and the index of its closing `$`.
pub(super) fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let rest = bytes.get(start + 1..)?;
    let tag_len = rest
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    if rest.get(tag_len) != Some(&b'$') {
        return None;
    }
    // `$1` style positional references are not quote openers
    if rest.first().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let tag = String::from_utf8(rest[..tag_len].to_vec()).ok()?;
    Some((tag, start + 1 + tag_len))
}

/// Whether the closing `$tag$` starts at `idx`.
pub(super) fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    bytes.get(idx) == Some(&b'$')
        && bytes.get(idx + 1..end) == Some(tag.as_bytes())
        && bytes.get(end) == Some(&b'$')
}
