//! Code-point cursor over a UTF-8 byte buffer.
//!
//! The buffer is decoded lazily, one code point at a time, so a malformed
//! byte sequence only affects the code point it belongs to.

/// One step of input, as seen by [`Cursor::peek`] and [`Cursor::consume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePoint {
    Char(char),
    /// Bytes that do not form valid UTF-8.
    Malformed,
    /// End of input.
    Eof,
}

impl CodePoint {
    pub fn is(self, c: char) -> bool {
        self == CodePoint::Char(c)
    }
}

/// Single-lookahead cursor tracking line, column and byte offset.
///
/// Lines and columns are 1-based; a column counts code points, not bytes.
#[derive(Debug, Clone)]
pub struct Cursor {
    buf: Vec<u8>,
    offset: usize,
    line: usize,
    column: usize,
    at_end: bool,
}

impl Cursor {
    pub fn new(buf: Vec<u8>) -> Self {
        Self {
            buf,
            offset: 0,
            line: 1,
            column: 1,
            at_end: false,
        }
    }

    /// A cursor that is already past the end of input.
    pub fn exhausted() -> Self {
        Self {
            at_end: true,
            ..Self::new(Vec::new())
        }
    }

    /// Look at the next code point without consuming it.
    pub fn peek(&self) -> CodePoint {
        self.decode().0
    }

    /// Consume and return the next code point.
    ///
    /// Consuming at the end of input sets the end flag; every later call
    /// returns [`CodePoint::Eof`] without moving.
    pub fn consume(&mut self) -> CodePoint {
        if self.at_end {
            return CodePoint::Eof;
        }

        let (cp, len) = self.decode();
        match cp {
            CodePoint::Eof => {
                self.at_end = true;
                return CodePoint::Eof;
            }
            CodePoint::Char('\n') => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        self.offset += len;
        cp
    }

    /// Consume the next code point if it is `c`.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek().is(c) {
            self.consume();
            true
        } else {
            false
        }
    }

    /// Consume the next code point if it is a character satisfying `f`,
    /// returning it.
    pub fn eat_if(&mut self, f: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            CodePoint::Char(c) if f(c) => {
                self.consume();
                Some(c)
            }
            _ => None,
        }
    }

    /// Whether the end flag is set (EOF has been consumed).
    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Decode the code point at the current offset and its byte length.
    fn decode(&self) -> (CodePoint, usize) {
        if self.at_end || self.offset >= self.buf.len() {
            return (CodePoint::Eof, 0);
        }

        let rest = &self.buf[self.offset..];
        let window = &rest[..rest.len().min(4)];
        let valid = match std::str::from_utf8(window) {
            Ok(s) => s,
            Err(e) if e.valid_up_to() > 0 => {
                std::str::from_utf8(&window[..e.valid_up_to()]).unwrap_or_default()
            }
            // `error_len` is `None` when the input ends mid-sequence.
            Err(e) => return (CodePoint::Malformed, e.error_len().unwrap_or(rest.len())),
        };

        match valid.chars().next() {
            Some(c) => (CodePoint::Char(c), c.len_utf8()),
            None => (CodePoint::Malformed, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cursor(source: &str) -> Cursor {
        Cursor::new(source.as_bytes().to_vec())
    }

    #[test]
    fn test_peek_does_not_advance() {
        let c = cursor("ab");
        assert_eq!(c.peek(), CodePoint::Char('a'));
        assert_eq!(c.peek(), CodePoint::Char('a'));
        assert_eq!(c.offset(), 0);
    }

    #[test]
    fn test_consume_returns_consumed_char() {
        let mut c = cursor("ab");
        assert_eq!(c.consume(), CodePoint::Char('a'));
        assert_eq!(c.consume(), CodePoint::Char('b'));
        assert_eq!(c.peek(), CodePoint::Eof);
    }

    #[test]
    fn test_columns_count_code_points() {
        let mut c = cursor("λx");
        c.consume();
        assert_eq!(c.column(), 2);
        assert_eq!(c.offset(), 2);
        c.consume();
        assert_eq!(c.column(), 3);
        assert_eq!(c.offset(), 3);
    }

    #[test]
    fn test_newline_moves_to_next_line() {
        let mut c = cursor("a\nb");
        c.consume();
        c.consume();
        assert_eq!((c.line(), c.column()), (2, 1));
        c.consume();
        assert_eq!((c.line(), c.column()), (2, 2));
    }

    #[test]
    fn test_consume_at_end_is_idempotent() {
        let mut c = cursor("a");
        c.consume();
        assert!(!c.is_at_end());
        assert_eq!(c.consume(), CodePoint::Eof);
        assert!(c.is_at_end());
        let pos = (c.offset(), c.line(), c.column());
        assert_eq!(c.consume(), CodePoint::Eof);
        assert_eq!(c.peek(), CodePoint::Eof);
        assert_eq!((c.offset(), c.line(), c.column()), pos);
    }

    #[test]
    fn test_malformed_byte_is_skipped() {
        let mut c = Cursor::new(vec![b'a', 0xff, b'b']);
        assert_eq!(c.consume(), CodePoint::Char('a'));
        assert_eq!(c.peek(), CodePoint::Malformed);
        assert_eq!(c.consume(), CodePoint::Malformed);
        assert_eq!(c.consume(), CodePoint::Char('b'));
    }

    #[test]
    fn test_truncated_sequence_at_end() {
        // First two bytes of a three-byte sequence.
        let mut c = Cursor::new(vec![0xe2, 0x82]);
        assert_eq!(c.consume(), CodePoint::Malformed);
        assert_eq!(c.consume(), CodePoint::Eof);
    }

    #[test]
    fn test_four_byte_char() {
        let mut c = cursor("😀!");
        assert_eq!(c.consume(), CodePoint::Char('😀'));
        assert_eq!(c.offset(), 4);
        assert_eq!(c.consume(), CodePoint::Char('!'));
    }

    #[test]
    fn test_eat_if() {
        let mut c = cursor("7x");
        assert_eq!(c.eat_if(|ch| ch.is_ascii_digit()), Some('7'));
        assert_eq!(c.eat_if(|ch| ch.is_ascii_digit()), None);
        assert!(c.eat('x'));
    }

    #[test]
    fn test_exhausted_cursor() {
        let mut c = Cursor::exhausted();
        assert!(c.is_at_end());
        assert_eq!(c.peek(), CodePoint::Eof);
        assert_eq!(c.consume(), CodePoint::Eof);
    }
}
