// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible window computation.

use core::ops::Range;

/// Inclusive range of window indices that should be visible.
///
/// Bounds are not clamped: `first` may be negative for negative scroll offsets
/// and `last` may exceed the item count. Clamping to `0..item_count` happens when
/// the window is reconciled, see [`Window::indices`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    /// First visible window index.
    pub first: isize,
    /// Last visible window index (inclusive).
    pub last: isize,
}

impl Window {
    /// Creates a window from inclusive bounds.
    #[must_use]
    pub const fn new(first: isize, last: isize) -> Self {
        Self { first, last }
    }

    /// Returns `true` if `index` lies within `[first, last]`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        isize::try_from(index).is_ok_and(|index| self.first <= index && index <= self.last)
    }

    /// Returns the window indices that exist in a strip of `item_count` items.
    #[must_use]
    pub fn indices(&self, item_count: usize) -> Range<usize> {
        let start = usize::try_from(self.first).unwrap_or(0);
        let end = usize::try_from(self.last)
            .map_or(0, |last| last.saturating_add(1))
            .min(item_count);
        start..end.max(start)
    }
}

/// Computes the window of item indices touched by a viewport.
///
/// `first = floor(offset / item_width)` and
/// `last = floor((offset + viewport_width) / item_width)`.
///
/// `item_width` is expected to be positive and finite.
#[must_use]
pub fn compute_window(offset: f64, viewport_width: f64, item_width: f64) -> Window {
    Window::new(
        floor_div(offset, item_width),
        floor_div(offset + viewport_width, item_width),
    )
}

/// Floors `value / divisor` and converts the result to `isize`.
///
/// Values beyond the `isize` range saturate.
pub(crate) fn floor_div(value: f64, divisor: f64) -> isize {
    let quotient = value / divisor;
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float to int casts saturate; results are clamped to the item range afterwards"
    )]
    let truncated = quotient as isize;
    // Truncation rounds toward zero; step down for fractional negative quotients.
    if (truncated as f64) > quotient {
        truncated - 1
    } else {
        truncated
    }
}
