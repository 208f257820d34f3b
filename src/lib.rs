//! An in-place JSON tokenizer and streaming emitter for resource-constrained
//! environments.
//!
//! `nanojson` provides two independent, `no_std` compatible subsystems that
//! share one philosophy: no heap, no hidden buffers, the caller owns every
//! byte of working memory.
//!
//! ## Main Types
//!
//! - [`parse`] / [`parse_str`] - Scan a JSON byte range into a caller-supplied
//!   array of [`Token`]s describing sub-ranges of the input (nothing is copied)
//! - [`Node`] - Navigate the parsed token array as a tree
//! - [`Emitter`] - Write well-formed JSON one byte at a time through a
//!   caller-supplied [`Sink`], tracking nesting on a caller-supplied stack of
//!   [`Level`]s
//!
//! ## Tokenizing
//!
//! ```rust
//! use nanojson::{parse_str, Token, TokenType};
//!
//! let mut tokens = [Token::default(); 8];
//! let count = parse_str(r#"{"temp": 21.5}"#, &mut tokens).expect("valid JSON");
//!
//! assert_eq!(count, 3);
//! assert_eq!(tokens[0].token_type(), TokenType::Object);
//! assert_eq!(tokens[1].text(), br#""temp""#);
//! assert_eq!(tokens[2].token_type(), TokenType::Number);
//! ```
//!
//! Tokens are stored in preorder: each container precedes its children, so
//! `tokens[0]` is always the root. A token records the complete textual form
//! of its element (containers span bracket to matching bracket, strings
//! include both quotes) plus its depth in the tree.
//!
//! ## Emitting
//!
//! ```rust
//! use nanojson::{Emitter, Level};
//!
//! let mut out = Vec::new();
//! let mut levels = [Level::default(); 4];
//! let mut jems = Emitter::new(|byte: u8| out.push(byte), &mut levels);
//!
//! jems.object_open()
//!     .key_integer("sku", 1785)
//!     .key_bool("stock", true)
//!     .object_close();
//!
//! drop(jems);
//! assert_eq!(out, br#"{"sku":1785,"stock":true}"#);
//! ```
//!
//! The sink is any `FnMut(u8)` closure (or a type implementing [`Sink`]); it
//! may write to a fixed buffer, a UART register, a socket - the emitter does
//! not care and never fails.
//!
//! ## Input character set
//!
//! The tokenizer accepts ASCII only. Any byte with the high bit set is
//! rejected with [`ParseError::NoMultibyte`], even inside string literals.
//! `\uXXXX` escapes are validated syntactically but not decoded. The emitter
//! escapes all non-ASCII and control bytes as `\uXXXX`, so its output is
//! 7-bit clean.

// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

mod chars;

mod error;
pub use error::ParseError;

mod token;
pub use token::{Token, TokenType, MAX_DEPTH};

mod tokenizer;
pub use tokenizer::{parse, parse_str};

mod tree;
pub use tree::Node;

mod emitter;
pub use emitter::{Emitter, Level, Sink};
