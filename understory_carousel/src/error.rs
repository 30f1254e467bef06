// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for carousel configuration and item preparation.

use core::fmt;

/// Error returned when a configuration change is rejected.
///
/// A rejected call leaves the previous state untouched.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CarouselError {
    /// The item width was zero, negative, or not finite.
    InvalidItemWidth(f64),
    /// The parallax tempo was not finite.
    InvalidTempo(f64),
    /// The item count cannot be represented in window index space.
    ///
    /// Counts above `isize::MAX` (including the two wraparound boundary slots)
    /// are rejected.
    ItemCountOverflow(usize),
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidItemWidth(width) => {
                write!(f, "item width must be positive and finite, got {width}")
            }
            Self::InvalidTempo(tempo) => write!(f, "parallax tempo must be finite, got {tempo}"),
            Self::ItemCountOverflow(count) => {
                write!(f, "item count {count} does not fit in window index space")
            }
        }
    }
}

impl core::error::Error for CarouselError {}

/// Error returned by an item factory that could not configure an instance.
///
/// The engine skips the index for the current pass and retries on the next
/// pass that still includes it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PrepareError {
    reason: &'static str,
}

impl PrepareError {
    /// Creates a preparation error with a short static reason.
    #[must_use]
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Returns the reason given by the factory.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.reason
    }
}

impl Default for PrepareError {
    fn default() -> Self {
        Self::new("no usable instance")
    }
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not prepare view: {}", self.reason)
    }
}

impl core::error::Error for PrepareError {}
