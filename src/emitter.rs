// SPDX-License-Identifier: Apache-2.0

//! Streaming JSON emitter.
//!
//! The emitter pushes bytes through a caller-supplied [`Sink`] one at a
//! time, deciding separators (`,` and `:`) from a caller-supplied stack of
//! [`Level`] records. It never allocates and never fails: depth overflow is
//! silently truncated and underflow clamped, because the constrained-target
//! policy is to keep emitting rather than abort. The output is valid JSON
//! iff the caller opens and closes containers in a legal order and, inside
//! objects, alternates keys with values; the emitter does not police that.

use core::fmt::Write;

/// Destination for emitter output, one byte at a time.
///
/// Implemented for every `FnMut(u8)` closure, which covers the common cases
/// (append to a buffer, poke a UART register). The sink is called
/// synchronously, in exact output order, and may block; it must not call
/// back into the emitter (the borrow checker enforces this for closures).
pub trait Sink {
    /// Consume one byte of output.
    fn write_byte(&mut self, byte: u8);
}

impl<F: FnMut(u8)> Sink for F {
    fn write_byte(&mut self, byte: u8) {
        self(byte)
    }
}

/// Per-depth emitter bookkeeping: how many items have been emitted at this
/// level, and whether the level is an object (which drives the `:`/`,`
/// alternation).
#[derive(Debug, Clone, Copy, Default)]
pub struct Level {
    item_count: usize,
    is_object: bool,
}

/// Adapter so `core::fmt` machinery (integer and float formatting) can
/// drive a [`Sink`] directly, with no intermediate buffer.
struct SinkWriter<'s, S: Sink>(&'s mut S);

impl<S: Sink> Write for SinkWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for byte in s.bytes() {
            self.0.write_byte(byte);
        }
        Ok(())
    }
}

/// Streaming JSON writer over a [`Sink`] and a caller-owned level stack.
///
/// Every operation returns `&mut Self`, so documents read as chains:
///
/// ```rust
/// use nanojson::{Emitter, Level};
///
/// let mut out = Vec::new();
/// let mut levels = [Level::default(); 8];
/// let mut jems = Emitter::new(|byte: u8| out.push(byte), &mut levels);
/// jems.array_open().integer(1).number(2.5).null().array_close();
/// drop(jems);
/// assert_eq!(out, b"[1,2.5,null]");
/// ```
pub struct Emitter<'l, S: Sink> {
    sink: S,
    levels: &'l mut [Level],
    curr_level: usize,
}

impl<'l, S: Sink> Emitter<'l, S> {
    /// A fresh emitter at depth 0. The `levels` slice bounds the nesting the
    /// emitter will track; containers opened beyond its capacity still emit
    /// their bracket but are not tracked (see module docs).
    pub fn new(sink: S, levels: &'l mut [Level]) -> Self {
        let mut emitter = Emitter {
            sink,
            levels,
            curr_level: 0,
        };
        emitter.reset();
        emitter
    }

    /// Return to depth 0, ready for a new document on the same sink.
    pub fn reset(&mut self) -> &mut Self {
        self.curr_level = 0;
        if let Some(level) = self.levels.first_mut() {
            *level = Level::default();
        }
        self
    }

    /// Current nesting depth.
    pub fn curr_level(&self) -> usize {
        self.curr_level
    }

    /// Number of items emitted so far at the current level. Inside an
    /// object, keys and values count separately.
    pub fn item_count(&self) -> usize {
        self.levels
            .get(self.curr_level)
            .map_or(0, |level| level.item_count)
    }

    // ------------------------------------------------------------------
    // Containers

    /// Emit `{` and descend into a new object level.
    pub fn object_open(&mut self) -> &mut Self {
        self.commify();
        self.emit(b'{');
        self.push_level(true)
    }

    /// Emit `}` and return to the enclosing level.
    pub fn object_close(&mut self) -> &mut Self {
        self.emit(b'}');
        self.pop_level()
    }

    /// Emit `[` and descend into a new array level.
    pub fn array_open(&mut self) -> &mut Self {
        self.commify();
        self.emit(b'[');
        self.push_level(false)
    }

    /// Emit `]` and return to the enclosing level.
    pub fn array_close(&mut self) -> &mut Self {
        self.emit(b']');
        self.pop_level()
    }

    // ------------------------------------------------------------------
    // Values

    /// Emit a quoted, escaped string.
    pub fn string(&mut self, s: &str) -> &mut Self {
        self.commify();
        self.emit(b'"');
        for byte in s.bytes() {
            self.emit_quoted_byte(byte);
        }
        self.emit(b'"')
    }

    /// Emit raw bytes as a quoted, escaped string. Unlike
    /// [`string`](Emitter::string), the input need not be UTF-8 and may
    /// contain NUL.
    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.commify();
        self.emit(b'"');
        for &byte in bytes {
            self.emit_quoted_byte(byte);
        }
        self.emit(b'"')
    }

    /// Emit a signed decimal integer.
    pub fn integer(&mut self, value: i64) -> &mut Self {
        self.commify();
        let _ = write!(SinkWriter(&mut self.sink), "{value}");
        self
    }

    /// Emit a number. A value that round-trips through `i64` is emitted as
    /// an integer (`3.0` becomes `3`); anything else uses the shortest
    /// decimal form that reproduces the value.
    pub fn number(&mut self, value: f64) -> &mut Self {
        let truncated = value as i64;
        if truncated as f64 == value {
            return self.integer(truncated);
        }
        self.commify();
        let _ = write!(SinkWriter(&mut self.sink), "{value}");
        self
    }

    /// Emit `true` or `false`.
    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.commify();
        self.emit_str(if value { "true" } else { "false" })
    }

    /// Emit `true`.
    pub fn true_value(&mut self) -> &mut Self {
        self.bool(true)
    }

    /// Emit `false`.
    pub fn false_value(&mut self) -> &mut Self {
        self.bool(false)
    }

    /// Emit `null`.
    pub fn null(&mut self) -> &mut Self {
        self.commify();
        self.emit_str("null")
    }

    /// Emit bytes verbatim: no quotes, no escaping. The literal still counts
    /// as one item at the current level, so separators stay correct. The
    /// caller is responsible for the bytes being valid JSON.
    pub fn literal(&mut self, bytes: &[u8]) -> &mut Self {
        self.commify();
        for &byte in bytes {
            self.emit(byte);
        }
        self
    }

    // ------------------------------------------------------------------
    // key:value pairs

    /// Emit a string key, then `{`.
    pub fn key_object_open(&mut self, key: &str) -> &mut Self {
        self.string(key).object_open()
    }

    /// Emit a string key, then `[`.
    pub fn key_array_open(&mut self, key: &str) -> &mut Self {
        self.string(key).array_open()
    }

    /// Emit a string key, then a string value.
    pub fn key_string(&mut self, key: &str, value: &str) -> &mut Self {
        self.string(key).string(value)
    }

    /// Emit a string key, then a byte-string value.
    pub fn key_bytes(&mut self, key: &str, value: &[u8]) -> &mut Self {
        self.string(key).bytes(value)
    }

    /// Emit a string key, then an integer value.
    pub fn key_integer(&mut self, key: &str, value: i64) -> &mut Self {
        self.string(key).integer(value)
    }

    /// Emit a string key, then a number value.
    pub fn key_number(&mut self, key: &str, value: f64) -> &mut Self {
        self.string(key).number(value)
    }

    /// Emit a string key, then `true` or `false`.
    pub fn key_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.string(key).bool(value)
    }

    /// Emit a string key, then `true`.
    pub fn key_true(&mut self, key: &str) -> &mut Self {
        self.string(key).true_value()
    }

    /// Emit a string key, then `false`.
    pub fn key_false(&mut self, key: &str) -> &mut Self {
        self.string(key).false_value()
    }

    /// Emit a string key, then `null`.
    pub fn key_null(&mut self, key: &str) -> &mut Self {
        self.string(key).null()
    }

    /// Emit a string key, then raw bytes verbatim.
    pub fn key_literal(&mut self, key: &str, value: &[u8]) -> &mut Self {
        self.string(key).literal(value)
    }

    // ------------------------------------------------------------------
    // Internals

    fn emit(&mut self, byte: u8) -> &mut Self {
        self.sink.write_byte(byte);
        self
    }

    fn emit_str(&mut self, s: &str) -> &mut Self {
        for byte in s.bytes() {
            self.emit(byte);
        }
        self
    }

    /// Emit one string-content byte, escaped as JSON requires: `\uXXXX` for
    /// controls and everything past ASCII, a backslash prefix for `"` and
    /// `\`, the byte itself otherwise. Keeps the output 7-bit clean.
    fn emit_quoted_byte(&mut self, byte: u8) {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        if byte < 0x20 || byte >= 0x7f {
            self.emit_str("\\u00");
            self.emit(HEX[(byte >> 4) as usize]);
            self.emit(HEX[(byte & 0x0f) as usize]);
        } else {
            if byte == b'\\' || byte == b'"' {
                self.emit(b'\\');
            }
            self.emit(byte);
        }
    }

    /// Emit the separator owed before the next item at the current level,
    /// and count the item.
    ///
    /// Within an object, item positions alternate key, value, key, value:
    /// position 0 takes no prefix, odd positions (values) take `:`, and
    /// later even positions (keys) take `,`. Within an array only position
    /// 0 goes bare.
    fn commify(&mut self) -> &mut Self {
        let Some(level) = self.levels.get_mut(self.curr_level) else {
            return self;
        };
        let count = level.item_count;
        let is_object = level.is_object;
        level.item_count += 1;

        if count > 0 {
            let separator = if is_object && count & 1 == 1 {
                b':'
            } else {
                b','
            };
            self.emit(separator);
        }
        self
    }

    /// Descend one level. At capacity the level is simply not pushed; the
    /// caller's bracket was already emitted, and subsequent separators are
    /// computed from the deepest tracked level.
    fn push_level(&mut self, is_object: bool) -> &mut Self {
        if self.curr_level + 1 < self.levels.len() {
            self.curr_level += 1;
            self.levels[self.curr_level] = Level {
                item_count: 0,
                is_object,
            };
        }
        self
    }

    fn pop_level(&mut self) -> &mut Self {
        if self.curr_level > 0 {
            self.curr_level -= 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_with(build: impl FnOnce(&mut Emitter<'_, &mut dyn FnMut(u8)>)) -> Vec<u8> {
        let mut out = Vec::new();
        let mut push = |byte| out.push(byte);
        let sink: &mut dyn FnMut(u8) = &mut push;
        let mut levels = [Level::default(); 8];
        let mut jems = Emitter::new(sink, &mut levels);
        build(&mut jems);
        drop(jems);
        out
    }

    #[test]
    fn object_separators_alternate() {
        let out = emit_with(|jems| {
            jems.object_open()
                .key_integer("a", 1)
                .key_integer("b", 2)
                .object_close();
        });
        assert_eq!(out, br#"{"a":1,"b":2}"#);
    }

    #[test]
    fn array_separators_are_commas() {
        let out = emit_with(|jems| {
            jems.array_open()
                .integer(1)
                .integer(2)
                .integer(3)
                .array_close();
        });
        assert_eq!(out, b"[1,2,3]");
    }

    #[test]
    fn number_integer_fast_path() {
        let out = emit_with(|jems| {
            jems.array_open()
                .number(3.0)
                .number(-2.5)
                .number(0.0)
                .array_close();
        });
        assert_eq!(out, b"[3,-2.5,0]");
    }

    #[test]
    fn integer_extremes() {
        let out = emit_with(|jems| {
            jems.array_open()
                .integer(i64::MIN)
                .integer(i64::MAX)
                .array_close();
        });
        assert_eq!(
            out,
            b"[-9223372036854775808,9223372036854775807]" as &[u8]
        );
    }

    #[test]
    fn depth_overflow_is_truncated_not_fatal() {
        let mut out = Vec::new();
        let mut levels = [Level::default(); 2];
        let mut jems = Emitter::new(|byte: u8| out.push(byte), &mut levels);
        jems.array_open().array_open().array_open();
        assert_eq!(jems.curr_level(), 1); // third open was not tracked
        jems.array_close().array_close().array_close();
        assert_eq!(jems.curr_level(), 0);
        drop(jems);
        // The untracked open still emitted its bracket, and the untracked
        // level fell back to the deepest tracked one for its separator.
        assert_eq!(out, b"[[,[]]]");
    }

    #[test]
    fn close_at_level_zero_is_clamped() {
        let out = emit_with(|jems| {
            jems.array_open().array_close().array_close();
            assert_eq!(jems.curr_level(), 0);
        });
        assert_eq!(out, b"[]]");
    }

    #[test]
    fn introspection_counts_keys_and_values_separately() {
        emit_with(|jems| {
            jems.object_open();
            assert_eq!(jems.curr_level(), 1);
            assert_eq!(jems.item_count(), 0);
            jems.string("key");
            assert_eq!(jems.item_count(), 1);
            jems.integer(1);
            assert_eq!(jems.item_count(), 2);
            jems.object_close();
            assert_eq!(jems.curr_level(), 0);
        });
    }

    #[test]
    fn reset_clears_the_separator_state() {
        let out = emit_with(|jems| {
            jems.integer(1);
            jems.reset().integer(2);
        });
        // Without the reset the second item would have drawn a comma.
        assert_eq!(out, b"12");
    }
}
