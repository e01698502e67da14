//! Character classification helpers for the IDL scanner.

/// Whitespace skipped between tokens.
#[inline]
pub fn is_white_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\u{000B}' | '\u{000C}')
}

/// Check if a character can start an identifier.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if a character is an octal digit (0-7).
#[inline]
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

/// Check if a character is a hex digit.
#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// Exponent marker of a floating point literal.
#[inline]
pub fn is_exponent_marker(ch: char) -> bool {
    matches!(ch, 'e' | 'E')
}

/// Suffix of a fixed point literal.
#[inline]
pub fn is_fixed_suffix(ch: char) -> bool {
    matches!(ch, 'd' | 'D')
}

/// The character denoted by a one-letter escape such as `\n` or `\?`.
#[inline]
pub fn simple_escape(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'v' => Some('\u{000B}'),
        'b' => Some('\u{0008}'),
        'r' => Some('\r'),
        'f' => Some('\u{000C}'),
        'a' => Some('\u{0007}'),
        '\\' => Some('\\'),
        '?' => Some('?'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    }
}
