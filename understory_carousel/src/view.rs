// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between the carousel engine and caller-defined content.

use alloc::boxed::Box;

use kurbo::Rect;

use crate::PrepareError;

/// A poolable content instance laid out by the carousel.
///
/// `Default::default()` is how the engine instantiates a fresh instance with no
/// data when the reuse pool is empty. Everything else about the instance,
/// including what it draws, belongs to the caller.
///
/// Instances are owned by the engine's store and are, at any time, either in
/// the visible set (attached) or in the reuse pool (detached).
pub trait ItemView: Default {
    /// Returns the current frame in content coordinates.
    fn frame(&self) -> Rect;

    /// Sets the frame in content coordinates.
    fn set_frame(&mut self, frame: Rect);

    /// Called with `true` when the instance is attached to the display tree and
    /// `false` when it is detached into the reuse pool.
    ///
    /// The default implementation does nothing.
    fn set_attached(&mut self, attached: bool) {
        let _ = attached;
    }
}

/// Caller-supplied configuration callback.
///
/// The factory receives a recycled (or freshly instantiated) instance and the
/// logical index it should display. It may reconfigure the instance in place or
/// replace it outright by assigning a new value. Returning an error skips the
/// index for the current pass.
pub type ItemFactory<V> = Box<dyn FnMut(&mut V, usize) -> Result<(), PrepareError>>;
