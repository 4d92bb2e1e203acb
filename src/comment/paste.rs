use crate::comment::comment_model::RawComment;

/// A colon at or beyond this char position is treated as part of the body,
/// not as the username separator.
pub const MAX_USERNAME_CHARS: usize = 50;

/// Parse pasted comments, one per line.
///
/// Accepts `username: comment` lines; a line without a usable colon is
/// taken whole as the username. Blank lines are ignored and produce no
/// record, so they never reach the totals.
pub fn parse_pasted(text: &str) -> Vec<RawComment> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> RawComment {
    match line.find(':') {
        Some(byte_idx) if is_username_separator(line, byte_idx) => {
            let username = line[..byte_idx].trim();
            let body = line[byte_idx + 1..].trim();
            RawComment::new(username, body)
        }
        _ => RawComment::new(line, ""),
    }
}

fn is_username_separator(line: &str, byte_idx: usize) -> bool {
    let char_idx = line[..byte_idx].chars().count();
    char_idx > 0 && char_idx < MAX_USERNAME_CHARS
}
