// SPDX-License-Identifier: Apache-2.0

/// Errors returned by the tokenizer.
///
/// Each variant maps to a stable negative integer via [`ParseError::code`],
/// for callers that ferry results across an FFI or protocol boundary where
/// `0` means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Illegal JSON format.
    BadFormat,
    /// Input ended with an unterminated form.
    Incomplete,
    /// No non-whitespace input found.
    NoEntities,
    /// Stray bytes after the top-level entity.
    StrayInput,
    /// The caller-supplied token array is full.
    NotEnoughTokens,
    /// Empty input buffer or empty token array.
    BadArgument,
    /// Nesting depth reached [`MAX_DEPTH`](crate::MAX_DEPTH).
    TooDeep,
    /// A byte with the high bit set was encountered; multi-byte UTF-8 is not
    /// supported.
    NoMultibyte,
    /// An unreachable-state guard fired. This indicates a bug in the
    /// tokenizer, not malformed input.
    Internal,
}

impl ParseError {
    /// The stable negative integer for this error.
    pub fn code(self) -> i32 {
        match self {
            ParseError::BadFormat => -1,
            ParseError::Incomplete => -2,
            ParseError::NoEntities => -3,
            ParseError::StrayInput => -4,
            ParseError::NotEnoughTokens => -5,
            ParseError::BadArgument => -6,
            ParseError::TooDeep => -7,
            ParseError::NoMultibyte => -8,
            ParseError::Internal => -9,
        }
    }

    /// A short upper-case name for this error.
    pub fn name(self) -> &'static str {
        match self {
            ParseError::BadFormat => "BAD_FORMAT",
            ParseError::Incomplete => "INCOMPLETE",
            ParseError::NoEntities => "NO_ENTITIES",
            ParseError::StrayInput => "STRAY_INPUT",
            ParseError::NotEnoughTokens => "NOT_ENOUGH_TOKENS",
            ParseError::BadArgument => "BAD_ARGUMENT",
            ParseError::TooDeep => "TOO_DEEP",
            ParseError::NoMultibyte => "NO_MULTIBYTE",
            ParseError::Internal => "INTERNAL",
        }
    }

    /// Map an integer code back to its name. `0` is `NONE` (success); codes
    /// outside the defined range report `UNKNOWN`.
    pub fn name_for_code(code: i32) -> &'static str {
        match code {
            0 => "NONE",
            -1 => "BAD_FORMAT",
            -2 => "INCOMPLETE",
            -3 => "NO_ENTITIES",
            -4 => "STRAY_INPUT",
            -5 => "NOT_ENOUGH_TOKENS",
            -6 => "BAD_ARGUMENT",
            -7 => "TOO_DEEP",
            -8 => "NO_MULTIBYTE",
            -9 => "INTERNAL",
            _ => "UNKNOWN",
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
