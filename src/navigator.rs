//! Position tracking over a bounded, ordered sequence.
//!
//! Three surfaces on the page step through a list one element at a time: the
//! project gallery modal (images of one project), the case-study carousel
//! (cards), and the skills scroller (panels). They all share
//! [`IndexNavigator`], which only knows a length and a current position.
//!
//! ## Wraparound
//!
//! Stepping past either end wraps to the opposite end:
//!
//! ```text
//! len = 4      next:      0 → 1 → 2 → 3 → 0
//!              previous:  0 → 3 → 2 → 1 → 0
//! ```
//!
//! Clamping would change what a visitor sees when pressing "next" on the last
//! image, so it is not offered. Sequences of length 0 or 1 never move.
//!
//! ## Build-time use
//!
//! The generated page has no runtime state for its carousels. The generator
//! walks a navigator over each sequence and bakes every slide's previous/next
//! targets into the markup (see [`slide_links`]), so following links on the
//! page is exactly replaying `next()`/`previous()`.

use thiserror::Error;

/// Rejected [`IndexNavigator::jump_to`] target.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("index {index} out of range for sequence of length {len}")]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Current position within a sequence of `len` elements.
///
/// Invariant: `position < len` whenever `len > 0`; `position == 0` when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexNavigator {
    position: usize,
    len: usize,
}

impl IndexNavigator {
    /// A navigator at position 0 over `len` elements.
    pub fn new(len: usize) -> Self {
        Self { position: 0, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Advance by one, wrapping from the last index to 0.
    pub fn next(&mut self) {
        if self.len <= 1 {
            return;
        }
        self.position = if self.position == self.len - 1 {
            0
        } else {
            self.position + 1
        };
    }

    /// Step back by one, wrapping from 0 to the last index.
    pub fn previous(&mut self) {
        if self.len <= 1 {
            return;
        }
        self.position = if self.position == 0 {
            self.len - 1
        } else {
            self.position - 1
        };
    }

    /// Move directly to `index`. Out-of-range targets leave the position untouched.
    pub fn jump_to(&mut self, index: usize) -> Result<(), OutOfRange> {
        if index >= self.len {
            return Err(OutOfRange {
                index,
                len: self.len,
            });
        }
        self.position = index;
        Ok(())
    }

    /// Back to the first element.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Rebind to a sequence of a different length, starting over at 0.
    pub fn rebind(&mut self, len: usize) {
        self.len = len;
        self.position = 0;
    }

    /// Where `previous()` and `next()` would land from here, without moving.
    ///
    /// Returns `None` for an empty sequence.
    pub fn neighbours(&self) -> Option<(usize, usize)> {
        if self.len == 0 {
            return None;
        }
        let mut prev = *self;
        prev.previous();
        let mut next = *self;
        next.next();
        Some((prev.position, next.position))
    }
}

/// Previous/next targets for one slide of a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideLinks {
    pub index: usize,
    pub previous: usize,
    pub next: usize,
}

/// Walk a navigator across a sequence of `len` slides and record where
/// previous/next lead from each one.
///
/// This is how the generator turns wraparound navigation into static anchors.
pub fn slide_links(len: usize) -> Vec<SlideLinks> {
    let mut nav = IndexNavigator::new(len);
    let mut links = Vec::with_capacity(len);
    for _ in 0..len {
        if let Some((previous, next)) = nav.neighbours() {
            links.push(SlideLinks {
                index: nav.position(),
                previous,
                next,
            });
        }
        nav.next();
    }
    links
}
