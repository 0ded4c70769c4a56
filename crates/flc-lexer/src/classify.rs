//! Character classes used by the scanner.
//!
//! Everything here is a pure function of its input.

/// Single-character punctuation. Any of these starts a delimiter token.
const DELIMITERS: &str = "<>()[]{},;:._+-*/%^&|=#!?";

/// Characters that end a name even though they are not whitespace.
const NAME_STOPS: &str = "\"();";

/// Two-character operators a delimiter may be extended into.
const OPERATORS: &[&str] = &[
    "++", "::", "&&", "||", "==", "<=", ">=", "!=", "->", "=>", ">>", "<<", ":=",
];

pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

pub fn is_delimiter(c: char) -> bool {
    !is_space(c) && DELIMITERS.contains(c)
}

pub fn is_name_start(c: char) -> bool {
    !is_space(c) && !is_delimiter(c) && !is_digit(c)
}

/// Names continue through anything but whitespace, `"`, parentheses and `;`.
/// Operator characters are absorbed: `a+b` is a single name.
pub fn is_name_part(c: char) -> bool {
    !is_space(c) && !NAME_STOPS.contains(c)
}

/// Whether `text` followed by `next` spells a two-character operator.
pub fn is_operator(text: &str, next: char) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(first), None) => OPERATORS.iter().any(|op| {
            let mut op = op.chars();
            op.next() == Some(first) && op.next() == Some(next)
        }),
        _ => false,
    }
}
