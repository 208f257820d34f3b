// SPDX-License-Identifier: Apache-2.0

//! Single-pass, in-place JSON tokenizer.
//!
//! The tokenizer walks the input once, recursive-descent style, and appends
//! one token per JSON element to the caller's array. A container's token is
//! appended before its contents are parsed, so the array ends up in preorder:
//! every node precedes its descendants and `tokens[0]` is the root.

use crate::chars;
use crate::error::ParseError;
use crate::token::{Token, TokenType, MAX_DEPTH};

/// Parse a JSON byte range into `tokens`, returning the number of tokens
/// written.
///
/// The input must hold exactly one JSON element (any value type, per
/// RFC 7159), optionally surrounded by whitespace. On success, tokens
/// `[0, count)` describe the input in preorder and the final token carries
/// the last-element marker. On error the contents of `tokens` are
/// unspecified.
///
/// An empty input or an empty token array fails with
/// [`ParseError::BadArgument`].
pub fn parse<'a>(input: &'a [u8], tokens: &mut [Token<'a>]) -> Result<usize, ParseError> {
    if input.is_empty() || tokens.is_empty() {
        return Err(ParseError::BadArgument);
    }

    // Clear stale state from any previous parse; navigation trusts the
    // last-element marker, not the array length.
    for slot in tokens.iter_mut() {
        *slot = Token::default();
    }

    let mut parser = Parser {
        input,
        pos: 0,
        tokens,
        count: 0,
        level: 0,
    };

    match parser.run() {
        Ok(count) => Ok(count),
        Err(err) => {
            log::debug!("parse: {err}");
            Err(err)
        }
    }
}

/// Parse a JSON string. Convenience wrapper over [`parse`]; the same ASCII
/// restriction applies, so any multi-byte character fails with
/// [`ParseError::NoMultibyte`].
pub fn parse_str<'a>(input: &'a str, tokens: &mut [Token<'a>]) -> Result<usize, ParseError> {
    parse(input.as_bytes(), tokens)
}

struct Parser<'a, 'b> {
    input: &'a [u8],
    pos: usize,
    tokens: &'b mut [Token<'a>],
    count: usize,
    level: usize,
}

// Recognizer contract: on entry, peek() returns the first byte of the
// element. On success, one token has been appended and finalized (containers
// finalize after their children), and the position is just past the element.
// On failure, the position and the most recent token are undefined.
impl<'a> Parser<'a, '_> {
    fn run(&mut self) -> Result<usize, ParseError> {
        self.parse_element()?;

        if self.count == 0 {
            return Err(ParseError::NoEntities);
        }

        self.skip_whitespace();
        if !self.at_end() {
            return Err(ParseError::StrayInput);
        }

        // Navigation stops on the marker, not the array length.
        self.tokens[self.count - 1].set_last();
        Ok(self.count)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if !chars::is_whitespace(byte) {
                break;
            }
            self.bump();
        }
    }

    /// Append a token of the given type at the current level. The text is
    /// filled in by [`close_token`](Self::close_token) once the element's
    /// extent is known; appending first is what yields preorder.
    fn open_token(&mut self, kind: TokenType) -> Result<usize, ParseError> {
        if self.level >= MAX_DEPTH {
            return Err(ParseError::TooDeep);
        }
        if self.count >= self.tokens.len() {
            return Err(ParseError::NotEnoughTokens);
        }
        let index = self.count;
        self.tokens[index] = Token::open(kind, self.level);
        self.count += 1;
        Ok(index)
    }

    fn close_token(&mut self, index: usize, start: usize) {
        self.tokens[index].set_text(&self.input[start..self.pos]);
        log::trace!(
            "found {} ({} bytes at {start})",
            self.tokens[index].token_type(),
            self.pos - start
        );
    }

    /// Parse one element, dispatched on its first non-whitespace byte.
    /// End of input is not an error here; the caller decides whether a
    /// missing element matters.
    fn parse_element(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        let Some(byte) = self.peek() else {
            return Ok(());
        };
        match byte {
            b'"' => self.parse_string(),
            b'-' | b'0'..=b'9' => self.parse_number(),
            b't' => self.parse_literal(b"true", TokenType::True),
            b'f' => self.parse_literal(b"false", TokenType::False),
            b'n' => self.parse_literal(b"null", TokenType::Null),
            b'{' => self.parse_object(),
            b'[' => self.parse_array(),
            _ => {
                log::debug!("parse_element: unrecognized byte 0x{byte:02x} at {}", self.pos);
                if byte & 0x80 != 0 {
                    Err(ParseError::NoMultibyte)
                } else {
                    Err(ParseError::BadFormat)
                }
            }
        }
    }

    fn parse_string(&mut self) -> Result<(), ParseError> {
        if self.peek() != Some(b'"') {
            return Err(ParseError::Internal);
        }
        log::trace!("parse_string at {}", self.pos);

        let start = self.pos;
        let token = self.open_token(TokenType::String)?;
        self.bump(); // opening quote

        loop {
            let Some(byte) = self.peek() else {
                log::debug!("parse_string: premature end of input");
                return Err(ParseError::Incomplete);
            };
            if byte == b'\\' {
                self.bump();
                self.parse_escape()?;
            } else if byte & 0x80 != 0 {
                return Err(ParseError::NoMultibyte);
            } else if byte < 0x20 {
                // Unescaped control characters are not allowed in strings.
                return Err(ParseError::BadFormat);
            } else if byte == b'"' {
                break;
            } else {
                self.bump();
            }
        }

        self.bump(); // closing quote
        self.close_token(token, start);
        Ok(())
    }

    /// Parse the remainder of an escape sequence, positioned just past the
    /// backslash.
    fn parse_escape(&mut self) -> Result<(), ParseError> {
        let Some(byte) = self.peek() else {
            return Err(ParseError::Incomplete);
        };
        match byte {
            b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                self.bump();
                Ok(())
            }
            b'u' => {
                self.bump();
                for _ in 0..4 {
                    match self.peek() {
                        Some(hex) if chars::is_hex_digit(hex) => self.bump(),
                        _ => return Err(ParseError::BadFormat),
                    }
                }
                Ok(())
            }
            _ => Err(ParseError::BadFormat),
        }
    }

    fn parse_number(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Some(byte) if byte == b'-' || chars::is_digit(byte) => {}
            _ => return Err(ParseError::Internal),
        }
        log::trace!("parse_number at {}", self.pos);

        // Starts as INTEGER; promoted to NUMBER if a fractional part or an
        // exponent shows up.
        let start = self.pos;
        let token = self.open_token(TokenType::Integer)?;

        if self.peek() == Some(b'-') {
            self.bump();
            if self.at_end() {
                return Err(ParseError::Incomplete);
            }
        }

        let mut has_leading_zero = false;
        if self.peek() == Some(b'0') {
            has_leading_zero = true;
            self.bump();
            if self.peek() == Some(b'0') {
                return Err(ParseError::BadFormat);
            }
        }

        let mut has_integer_part = false;
        while let Some(byte) = self.peek() {
            if !chars::is_digit(byte) {
                break;
            }
            has_integer_part = true;
            self.bump();
        }

        if has_leading_zero && has_integer_part {
            log::debug!("parse_number: leading zero followed by digits");
            return Err(ParseError::BadFormat);
        }
        if !has_leading_zero && !has_integer_part {
            log::debug!("parse_number: no digits in integer part");
            return Err(ParseError::BadFormat);
        }

        if self.peek() == Some(b'.') {
            self.tokens[token].set_type(TokenType::Number);
            self.bump();
            let mut has_fraction_digits = false;
            while let Some(byte) = self.peek() {
                if !chars::is_digit(byte) {
                    break;
                }
                has_fraction_digits = true;
                self.bump();
            }
            if !has_fraction_digits {
                log::debug!("parse_number: '.' with no fraction digits");
                return Err(ParseError::BadFormat);
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.tokens[token].set_type(TokenType::Number);
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            let mut has_exponent_digits = false;
            while let Some(byte) = self.peek() {
                if !chars::is_digit(byte) {
                    break;
                }
                has_exponent_digits = true;
                self.bump();
            }
            if !has_exponent_digits {
                log::debug!("parse_number: exponent with no digits");
                return Err(ParseError::BadFormat);
            }
        }

        self.close_token(token, start);
        Ok(())
    }

    fn parse_literal(&mut self, literal: &'static [u8], kind: TokenType) -> Result<(), ParseError> {
        if self.at_end() {
            return Err(ParseError::Internal);
        }
        log::trace!("parse_literal at {}", self.pos);

        let start = self.pos;
        let token = self.open_token(kind)?;

        for &expected in literal {
            match self.peek() {
                None => return Err(ParseError::Incomplete),
                Some(byte) if byte == expected => self.bump(),
                Some(_) => return Err(ParseError::BadFormat),
            }
        }

        self.close_token(token, start);
        Ok(())
    }

    /// Skip whitespace, require `delimiter`, skip whitespace again. Used for
    /// the `,` and `:` between container items; more input must follow the
    /// delimiter, so end of input on either side is a format error.
    fn find_and_skip(&mut self, delimiter: u8) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(byte) if byte == delimiter => self.bump(),
            _ => {
                log::debug!("find_and_skip: '{}' not found", delimiter as char);
                return Err(ParseError::BadFormat);
            }
        }
        self.skip_whitespace();
        if self.at_end() {
            log::debug!("find_and_skip: end of input after '{}'", delimiter as char);
            return Err(ParseError::BadFormat);
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<(), ParseError> {
        if self.peek() != Some(b'{') {
            return Err(ParseError::Internal);
        }
        log::trace!("parse_object at {}", self.pos);

        let start = self.pos;
        let token = self.open_token(TokenType::Object)?;
        self.level += 1;
        self.bump(); // '{' is included in the token text

        let mut first_pair = true;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b'}') => break,
                Some(_) => {}
            }
            if !first_pair {
                self.find_and_skip(b',')?;
            }
            first_pair = false;

            match self.peek() {
                Some(b'"') => self.parse_string()?,
                Some(byte) if byte & 0x80 != 0 => return Err(ParseError::NoMultibyte),
                _ => {
                    log::debug!("parse_object: key is not a string at {}", self.pos);
                    return Err(ParseError::BadFormat);
                }
            }
            self.find_and_skip(b':')?;
            self.parse_element()?;
        }

        if self.at_end() {
            log::debug!("parse_object: premature end of input");
            return Err(ParseError::Incomplete);
        }

        self.bump(); // '}' is included in the token text
        self.level -= 1;
        self.close_token(token, start);
        Ok(())
    }

    fn parse_array(&mut self) -> Result<(), ParseError> {
        if self.peek() != Some(b'[') {
            return Err(ParseError::Internal);
        }
        log::trace!("parse_array at {}", self.pos);

        let start = self.pos;
        let token = self.open_token(TokenType::Array)?;
        self.level += 1;
        self.bump(); // '[' is included in the token text

        let mut first_element = true;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b']') => break,
                Some(_) => {}
            }
            if !first_element {
                self.find_and_skip(b',')?;
            }
            first_element = false;

            self.parse_element()?;
        }

        if self.at_end() {
            log::debug!("parse_array: premature end of input");
            return Err(ParseError::Incomplete);
        }

        self.bump(); // ']' is included in the token text
        self.level -= 1;
        self.close_token(token, start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(input: &str) -> Result<(TokenType, usize), ParseError> {
        let mut tokens = [Token::default(); 4];
        let count = parse_str(input, &mut tokens)?;
        Ok((tokens[0].token_type(), count))
    }

    #[test]
    fn number_grammar_accepts() {
        assert_eq!(parse_one("0"), Ok((TokenType::Integer, 1)));
        assert_eq!(parse_one("-0"), Ok((TokenType::Integer, 1)));
        assert_eq!(parse_one("123"), Ok((TokenType::Integer, 1)));
        assert_eq!(parse_one("-123"), Ok((TokenType::Integer, 1)));
        assert_eq!(parse_one("0.5"), Ok((TokenType::Number, 1)));
        assert_eq!(parse_one("1e5"), Ok((TokenType::Number, 1)));
        assert_eq!(parse_one("1E-5"), Ok((TokenType::Number, 1)));
        assert_eq!(parse_one("-1.25e+3"), Ok((TokenType::Number, 1)));
    }

    #[test]
    fn number_grammar_rejects() {
        assert_eq!(parse_one("00"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("01"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("1."), Err(ParseError::BadFormat));
        assert_eq!(parse_one(".5"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("1e"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("1e+"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("-x"), Err(ParseError::BadFormat));
        // A lone sign is the one number shape that reads as truncated input.
        assert_eq!(parse_one("-"), Err(ParseError::Incomplete));
    }

    #[test]
    fn integer_is_promoted_only_by_fraction_or_exponent() {
        assert_eq!(parse_one("10"), Ok((TokenType::Integer, 1)));
        assert_eq!(parse_one("10.0"), Ok((TokenType::Number, 1)));
        assert_eq!(parse_one("10e0"), Ok((TokenType::Number, 1)));
    }

    #[test]
    fn string_grammar() {
        assert_eq!(parse_one(r#""""#), Ok((TokenType::String, 1)));
        assert_eq!(parse_one(r#""a\"b""#), Ok((TokenType::String, 1)));
        assert_eq!(parse_one(r#""\\\/\b\f\n\r\t""#), Ok((TokenType::String, 1)));
        assert_eq!(parse_one(r#""A""#), Ok((TokenType::String, 1)));

        assert_eq!(parse_one(r#""abc"#), Err(ParseError::Incomplete));
        assert_eq!(parse_one("\"a\\"), Err(ParseError::Incomplete));
        assert_eq!(parse_one(r#""\x""#), Err(ParseError::BadFormat));
        // Truncated or malformed \uXXXX is a format error, not incomplete.
        assert_eq!(parse_one(r#""\u12"#), Err(ParseError::BadFormat));
        assert_eq!(parse_one(r#""\u12G4""#), Err(ParseError::BadFormat));
        // Raw control character inside a string.
        assert_eq!(parse_one("\"a\x01b\""), Err(ParseError::BadFormat));
        assert_eq!(parse_one("\"a\nb\""), Err(ParseError::BadFormat));
    }

    #[test]
    fn literal_grammar() {
        assert_eq!(parse_one("true"), Ok((TokenType::True, 1)));
        assert_eq!(parse_one("false"), Ok((TokenType::False, 1)));
        assert_eq!(parse_one("null"), Ok((TokenType::Null, 1)));

        assert_eq!(parse_one("tru"), Err(ParseError::Incomplete));
        assert_eq!(parse_one("truthy"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("False"), Err(ParseError::BadFormat));
        // The literal itself parses; the trailing byte is the problem.
        assert_eq!(parse_one("nulll"), Err(ParseError::StrayInput));
    }

    #[test]
    fn object_grammar_rejects() {
        assert_eq!(parse_one("{1:2}"), Err(ParseError::BadFormat));
        assert_eq!(parse_one(r#"{"a" 1}"#), Err(ParseError::BadFormat));
        assert_eq!(parse_one(r#"{"a":1,}"#), Err(ParseError::BadFormat));
        assert_eq!(parse_one(r#"{"a":1 "b":2}"#), Err(ParseError::BadFormat));
        assert_eq!(parse_one(r#"{"a":}"#), Err(ParseError::BadFormat));
        assert_eq!(parse_one(r#"{"a""#), Err(ParseError::BadFormat));
        assert_eq!(parse_one(r#"{"a":1"#), Err(ParseError::Incomplete));
        assert_eq!(parse_one("{"), Err(ParseError::Incomplete));
    }

    #[test]
    fn array_grammar_rejects() {
        assert_eq!(parse_one("[1 2]"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("[1,]"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("[1,"), Err(ParseError::BadFormat));
        assert_eq!(parse_one("[1"), Err(ParseError::Incomplete));
        assert_eq!(parse_one("]"), Err(ParseError::BadFormat));
    }

    #[test]
    fn whitespace_is_tolerated_everywhere() {
        let mut tokens = [Token::default(); 8];
        let count = parse_str(" \t\r\n{ \"a\" : [ 1 , 2 ] } \n", &mut tokens).unwrap();
        assert_eq!(count, 5);
        assert_eq!(tokens[0].token_type(), TokenType::Object);
        assert_eq!(tokens[2].token_type(), TokenType::Array);
    }

    #[test]
    fn container_text_spans_brackets() {
        let mut tokens = [Token::default(); 8];
        parse_str(r#"{"a":[1]}"#, &mut tokens).unwrap();
        assert_eq!(tokens[0].text(), br#"{"a":[1]}"#);
        assert_eq!(tokens[2].text(), b"[1]");
    }

    #[test]
    fn token_array_exhaustion() {
        let mut tokens = [Token::default(); 2];
        assert_eq!(
            parse_str("[1,2,3]", &mut tokens),
            Err(ParseError::NotEnoughTokens)
        );
    }
}
