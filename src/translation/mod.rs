use std::borrow::Cow;

mod lexer;

use lexer::{
    State, is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    scan_digits, try_start_dollar_quote,
};

/// Native placeholder style of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` placeholders, bound by position (MySQL, SQLite). Nothing to rewrite.
    Positional,
    /// PostgreSQL-style `$1`, `$2`, ...
    Dollar,
    /// SQL Server-style `@P1`, `@P2`, ...
    AtP,
}

impl PlaceholderStyle {
    fn prefix(self) -> &'static str {
        match self {
            PlaceholderStyle::Positional => "?",
            PlaceholderStyle::Dollar => "$",
            PlaceholderStyle::AtP => "@P",
        }
    }
}

/// Rewrite `?` placeholders into the target backend's native style.
///
/// Bare `?` marks are numbered left to right starting at 1; an explicit `?N` keeps its index.
/// Placeholders inside quoted strings, comments, and dollar-quoted blocks are left alone.
/// Returns a borrowed `Cow` when no changes are needed.
///
/// ```rust
/// use sql_tablekit::translation::{PlaceholderStyle, translate_placeholders};
///
/// let sql = "UPDATE users SET name = ? WHERE id = ?";
/// assert_eq!(
///     translate_placeholders(sql, PlaceholderStyle::Dollar),
///     "UPDATE users SET name = $1 WHERE id = $2"
/// );
/// ```
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle) -> Cow<'_, str> {
    if target == PlaceholderStyle::Positional || !sql.contains('?') {
        return Cow::Borrowed(sql);
    }

    let prefix = target.prefix();
    let mut out: Option<String> = None;
    let mut state = State::Normal;
    let mut next_index = 1usize;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        let mut replaced = false;
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => state = State::BlockComment(1),
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        if let Some(ref mut buf) = out {
                            buf.push_str(&sql[idx..=advance]);
                        }
                        state = State::DollarQuoted(tag);
                        idx = advance + 1;
                        continue;
                    }
                }
                b'?' => {
                    let buf = out.get_or_insert_with(|| sql[..idx].to_string());
                    buf.push_str(prefix);
                    if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        buf.push_str(digits);
                        idx = digits_end - 1;
                    } else {
                        buf.push_str(&next_index.to_string());
                        next_index += 1;
                    }
                    replaced = true;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        if let Some(ref mut buf) = out {
                            buf.push('\'');
                        }
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        if let Some(ref mut buf) = out {
                            buf.push('"');
                        }
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                } else if is_block_comment_end(bytes, idx) {
                    if let Some(ref mut buf) = out {
                        buf.push('*');
                    }
                    idx += 1;
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let end = idx + tag.len() + 1;
                    if let Some(ref mut buf) = out {
                        buf.push_str(&sql[idx..=end]);
                    }
                    state = State::Normal;
                    idx = end + 1;
                    continue;
                }
            }
        }

        if let Some(ref mut buf) = out
            && !replaced
        {
            push_byte(buf, sql, idx);
        }

        idx += 1;
    }

    match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(sql),
    }
}

/// Copy the byte at `idx`, keeping multi-byte UTF-8 sequences intact.
fn push_byte(buf: &mut String, sql: &str, idx: usize) {
    if sql.is_char_boundary(idx) {
        if let Some(ch) = sql[idx..].chars().next() {
            buf.push(ch);
        }
    }
}
