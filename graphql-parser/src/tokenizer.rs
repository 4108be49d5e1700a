use std::fmt;

use combine::error::StreamError;
use combine::stream::easy::{Error, Errors};
use combine::stream::Resetable;
use combine::{Positioned, StreamOnce};

use crate::position::Pos;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Kind {
    Punctuator,
    Name,
    IntValue,
    FloatValue,
    StringValue,
    BlockString,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'a> {
    pub kind: Kind,
    pub value: &'a str,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TokenStream<'a> {
    buf: &'a str,
    position: Pos,
    off: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Checkpoint {
    position: Pos,
    off: usize,
}

impl<'a> StreamOnce for TokenStream<'a> {
    type Item = Token<'a>;
    type Range = Token<'a>;
    type Position = Pos;
    type Error = Errors<Token<'a>, Token<'a>, Pos>;

    fn uncons(&mut self) -> Result<Self::Item, Error<Token<'a>, Token<'a>>> {
        let (kind, len) = self.take_token()?;
        let value = &self.buf[self.off..self.off + len];
        self.update_position(len);
        self.skip_whitespace();
        Ok(Token { kind, value })
    }
}

impl<'a> Positioned for TokenStream<'a> {
    fn position(&self) -> Self::Position {
        self.position
    }
}

impl<'a> Resetable for TokenStream<'a> {
    type Checkpoint = Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint {
        Checkpoint {
            position: self.position,
            off: self.off,
        }
    }

    fn reset(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.off = checkpoint.off;
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn ends_number(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\r' | '\n' | ',' | '#' | '"' | '!' | '$' | ':' | '=' | '@' | '|' | '&'
            | '(' | ')' | '[' | ']' | '{' | '}' | '\u{feff}'
    )
}

/// Integer part of a number literal: optional minus, no leading zeros
fn check_int(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    match digits.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

fn check_float(value: &str, exponent: Option<usize>, real: Option<usize>) -> bool {
    let int_end = match (real, exponent) {
        (Some(r), _) => r,
        (None, Some(e)) => e,
        (None, None) => return false,
    };
    // a fraction needs at least one digit, and comes before the exponent
    if let Some(r) = real {
        let fraction_end = exponent.unwrap_or_else(|| value.len());
        if fraction_end <= r + 1 || !value[r + 1..fraction_end].bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    check_int(&value[..int_end]) && value.parse::<f64>().is_ok()
}

impl<'a> TokenStream<'a> {
    pub fn new(s: &str) -> TokenStream {
        let mut me = TokenStream {
            buf: s,
            position: Pos { line: 1, column: 1 },
            off: 0,
        };
        me.skip_whitespace();
        me
    }

    /// Scans the next token without consuming it
    fn take_token(&self) -> Result<(Kind, usize), Error<Token<'a>, Token<'a>>> {
        use self::Kind::*;
        let rest = &self.buf[self.off..];
        let mut iter = rest.char_indices();
        let cur_char = match iter.next() {
            Some((_, c)) => c,
            None => return Err(Error::end_of_input()),
        };

        match cur_char {
            '!' | '$' | ':' | '=' | '@' | '|' | '&' | '(' | ')' | '[' | ']' | '{' | '}' => {
                Ok((Punctuator, 1))
            }
            '.' => {
                if rest.starts_with("...") {
                    Ok((Punctuator, 3))
                } else {
                    Err(Error::unexpected_message(
                        "bare dot is not supported, only \"...\"",
                    ))
                }
            }
            c if is_name_start(c) => {
                let len = iter
                    .find(|&(_, c)| !is_name_continue(c))
                    .map_or(rest.len(), |(idx, _)| idx);
                Ok((Name, len))
            }
            '-' | '0'..='9' => {
                let mut exponent = None;
                let mut real = None;
                let mut len = rest.len();
                for (idx, c) in iter {
                    match c {
                        c if ends_number(c) => {
                            len = idx;
                            break;
                        }
                        '.' => real = Some(idx),
                        'e' | 'E' => exponent = Some(idx),
                        _ => {}
                    }
                }
                let value = &rest[..len];
                if exponent.is_some() || real.is_some() {
                    if !check_float(value, exponent, real) {
                        return Err(Error::unexpected_message(format_args!(
                            "unsupported float {:?}",
                            value
                        )));
                    }
                    Ok((FloatValue, len))
                } else {
                    if !check_int(value) {
                        return Err(Error::unexpected_message(format_args!(
                            "unsupported integer {:?}",
                            value
                        )));
                    }
                    Ok((IntValue, len))
                }
            }
            '"' => {
                if rest.starts_with(r#"""""#) {
                    let tail = &rest[3..];
                    for (end, _) in tail.match_indices(r#"""""#) {
                        if !tail[..end].ends_with('\\') {
                            return Ok((BlockString, end + 6));
                        }
                    }
                    Err(Error::unexpected_message("unterminated block string value"))
                } else {
                    let mut escaped = false;
                    for (idx, c) in iter {
                        match c {
                            '"' if !escaped => return Ok((StringValue, idx + 1)),
                            '\n' | '\r' => break,
                            _ => {}
                        }
                        escaped = !escaped && c == '\\';
                    }
                    Err(Error::unexpected_message("unterminated string value"))
                }
            }
            _ => Err(Error::unexpected_message(format_args!(
                "unexpected character {:?}",
                cur_char
            ))),
        }
    }

    fn skip_whitespace(&mut self) {
        let num = {
            let mut iter = self.buf[self.off..].char_indices();
            loop {
                let (idx, cur_char) = match iter.next() {
                    Some(pair) => pair,
                    None => break (self.buf.len() - self.off),
                };
                match cur_char {
                    '\u{feff}' | '\t' | ' ' |
                    '\r' | '\n' |
                    // commas are insignificant
                    ',' => continue,
                    '#' => {
                        for (_, cur_char) in iter.by_ref() {
                            if cur_char == '\r' || cur_char == '\n' {
                                break;
                            }
                        }
                        continue;
                    }
                    _ => break idx,
                }
            }
        };
        if num > 0 {
            self.update_position(num);
        }
    }

    fn update_position(&mut self, len: usize) {
        let val = &self.buf[self.off..][..len];
        self.off += len;
        let lines = val.as_bytes().iter().filter(|&&x| x == b'\n').count();
        self.position.line += lines;
        match val.rfind('\n') {
            Some(line_offset) if lines > 0 => {
                self.position.column = val[line_offset + 1..].chars().count() + 1;
            }
            _ => {
                self.position.column += val.chars().count();
            }
        }
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{:?}]", self.value, self.kind)
    }
}

#[cfg(test)]
mod test {
    use super::Kind::*;
    use super::{Kind, TokenStream};

    use combine::stream::easy::Error;
    use combine::{Positioned, StreamOnce};

    fn tokens(s: &str) -> Vec<(Kind, &str)> {
        let mut r = Vec::new();
        let mut s = TokenStream::new(s);
        loop {
            match s.uncons() {
                Ok(x) => r.push((x.kind, x.value)),
                Err(ref e) if e == &Error::end_of_input() => break,
                Err(e) => panic!("Parse error at: {}, {}", s.position(), e),
            }
        }
        r
    }

    fn tok_str(s: &str) -> Vec<&str> {
        tokens(s).into_iter().map(|(_, v)| v).collect()
    }

    fn tok_typ(s: &str) -> Vec<Kind> {
        tokens(s).into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn comments_and_commas() {
        assert_eq!(tok_str("# hello { world }"), &[] as &[&str]);
        assert_eq!(tok_str("# x\n,,,"), &[] as &[&str]);
        assert_eq!(tok_str(", ,,  ,,,  # x"), &[] as &[&str]);
    }

    #[test]
    fn simple() {
        assert_eq!(tok_str("a { b }"), ["a", "{", "b", "}"]);
        assert_eq!(tok_typ("a { b }"), [Name, Punctuator, Name, Punctuator]);
    }

    #[test]
    fn query() {
        assert_eq!(
            tok_str(
                "query Query {
            object { field }
        }"
            ),
            ["query", "Query", "{", "object", "{", "field", "}", "}"]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokens("-1 0 12 1.5 -0.25 1e10 6.0E-3"),
            [
                (IntValue, "-1"),
                (IntValue, "0"),
                (IntValue, "12"),
                (FloatValue, "1.5"),
                (FloatValue, "-0.25"),
                (FloatValue, "1e10"),
                (FloatValue, "6.0E-3"),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "unsupported integer")]
    fn leading_zero() {
        tokens("012");
    }

    #[test]
    #[should_panic(expected = "unsupported float")]
    fn dot_without_fraction() {
        tokens("1.");
    }

    #[test]
    #[should_panic(expected = "unsupported float")]
    fn dot_before_exponent() {
        tokens("1.e5");
    }

    #[test]
    fn strings() {
        assert_eq!(
            tokens(r#""a \" b" """block "quoted" """"#),
            [
                (StringValue, r#""a \" b""#),
                (BlockString, r#""""block "quoted" """"#),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "unterminated string")]
    fn unterminated_string() {
        tokens("\"abc\n\"");
    }

    #[test]
    fn spread_and_positions() {
        let mut s = TokenStream::new("{\n  ...Frag\n}");
        assert_eq!(s.uncons().map(|t| t.value), Ok("{"));
        assert_eq!(format!("{}", s.position()), "2:3");
        assert_eq!(s.uncons().map(|t| t.value), Ok("..."));
        assert_eq!(s.uncons().map(|t| t.value), Ok("Frag"));
        assert_eq!(format!("{}", s.position()), "3:1");
    }
}
