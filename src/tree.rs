// SPDX-License-Identifier: Apache-2.0

//! Tree navigation over a parsed token array.
//!
//! These operations assume what the tokenizer guarantees:
//! - tokens form a densely packed array in preorder,
//! - the first token is the root, at level 0,
//! - the final token carries the last-element marker.
//!
//! A [`Node`] is a cursor: the token slice plus an index into it. Cursors
//! are cheap to copy; every move returns a fresh cursor (or `None` at a
//! boundary) and never mutates the tokens.

use crate::token::Token;

/// A position within a parsed token array.
#[derive(Debug, Clone, Copy)]
pub struct Node<'t, 'a> {
    tokens: &'t [Token<'a>],
    index: usize,
}

impl<'t, 'a> Node<'t, 'a> {
    /// A cursor at `index`, or `None` if the index is out of bounds.
    pub fn new(tokens: &'t [Token<'a>], index: usize) -> Option<Self> {
        (index < tokens.len()).then_some(Node { tokens, index })
    }

    /// The token under the cursor.
    pub fn token(&self) -> &'t Token<'a> {
        &self.tokens[self.index]
    }

    /// Physical position in the token array.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True iff this is the first token, which is always the root.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// True iff this token carries the last-element marker.
    pub fn is_last(&self) -> bool {
        self.token().is_last()
    }

    /// The physically previous token; `None` at the start of the array.
    pub fn prev(self) -> Option<Self> {
        if self.is_first() {
            return None;
        }
        Node::new(self.tokens, self.index - 1)
    }

    /// The physically next token. Stops at the last-element marker rather
    /// than the slice boundary, so over-sized token buffers navigate the
    /// same as exact slices.
    pub fn next(self) -> Option<Self> {
        if self.is_last() {
            return None;
        }
        Node::new(self.tokens, self.index + 1)
    }

    /// The root of the tree: the first token.
    pub fn root(self) -> Self {
        Node {
            tokens: self.tokens,
            index: 0,
        }
    }

    /// The closest preceding token one level up; `None` for the root.
    pub fn parent(self) -> Option<Self> {
        if self.is_first() {
            return None;
        }
        let target_level = self.token().level().checked_sub(1)?;
        let mut current = self;
        while current.token().level() > target_level {
            current = current.prev()?;
        }
        Some(current)
    }

    /// The first child: the next token, iff it nests below this one.
    pub fn child(self) -> Option<Self> {
        let next = self.next()?;
        (next.token().level() > self.token().level()).then_some(next)
    }

    /// The next token at the same level within the same parent.
    pub fn next_sibling(self) -> Option<Self> {
        self.sibling(Node::next)
    }

    /// The previous token at the same level within the same parent.
    pub fn prev_sibling(self) -> Option<Self> {
        self.sibling(Node::prev)
    }

    /// Walk `step`-wise until a token at this token's level appears. A token
    /// at a shallower level means we left the parent; stop there.
    fn sibling(self, step: fn(Self) -> Option<Self>) -> Option<Self> {
        if self.is_first() {
            return None;
        }
        let target_level = self.token().level();
        let mut current = self;
        loop {
            current = step(current)?;
            let level = current.token().level();
            if level == target_level {
                return Some(current);
            }
            if level < target_level {
                return None;
            }
        }
    }
}
