//! RFC 1459 case mapping.

/// Lowercase one character under RFC 1459 rules (`[]\~` fold to `{}|^`).
#[inline]
fn irc_lower(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c.to_ascii_lowercase(),
    }
}

/// Compare two nicks or channel names case-insensitively.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().map(irc_lower).eq(b.chars().map(irc_lower))
}
