// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seamless wraparound on top of [`WindowedRecycler`].
//!
//! With `n >= 2` items the adapter lays out `n + 2` window slots:
//!
//! ```text
//! slot:    0       1     2    ...   n      n + 1
//! shows:   n - 1   0     1    ...   n - 1  0
//! ```
//!
//! The two boundary slots duplicate the real tail and head. Whenever a pass
//! finds the offset past either boundary it snaps the offset back into the
//! interior, where identical content is on screen, so the jump is invisible.
//!
//! Below two items every operation behaves exactly like the base recycler.

use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::{
    CarouselConfig, CarouselError, ItemView, LayoutPass, PrepareError, ScrollRequest, ViewId,
    Window, WindowedRecycler,
};

/// Smallest item count for which wraparound is active.
pub const MIN_ITEMS_FOR_WRAPAROUND: usize = 2;

/// Number of synthetic boundary slots added when wraparound is active.
pub const BOUNDARY_SLOTS: usize = 2;

/// Maps a window slot to the original item it displays.
///
/// - Slot `0` mirrors the last item.
/// - Slots past `original_count` mirror the first item.
/// - Every other slot `s` shows item `s - 1`.
#[must_use]
pub fn remap_index(window_index: usize, original_count: usize) -> usize {
    if window_index == 0 {
        original_count.saturating_sub(1)
    } else if window_index > original_count {
        0
    } else {
        window_index - 1
    }
}

/// Infinitely looping pager built on a [`WindowedRecycler`].
#[derive(Debug)]
pub struct WraparoundAdapter<V> {
    base: WindowedRecycler<V>,
    original_count: usize,
}

impl<V: ItemView> WraparoundAdapter<V> {
    /// Creates an empty adapter.
    pub fn new(config: CarouselConfig) -> Result<Self, CarouselError> {
        Ok(Self {
            base: WindowedRecycler::new(config)?,
            original_count: 0,
        })
    }

    /// Returns the wrapped recycler.
    #[must_use]
    pub fn base(&self) -> &WindowedRecycler<V> {
        &self.base
    }

    /// Returns the wrapped recycler mutably.
    pub fn base_mut(&mut self) -> &mut WindowedRecycler<V> {
        &mut self.base
    }

    /// Returns `true` when boundary slots and index remapping are in effect.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.original_count >= MIN_ITEMS_FOR_WRAPAROUND
    }

    /// Returns the item count passed to the last reload.
    #[must_use]
    pub fn original_count(&self) -> usize {
        self.original_count
    }

    /// Returns the page width.
    #[must_use]
    pub fn item_width(&self) -> f64 {
        self.base.item_width()
    }

    /// Sets the page width. See [`WindowedRecycler::set_item_width`].
    pub fn set_item_width(&mut self, width: f64) -> Result<(), CarouselError> {
        self.base.set_item_width(width)
    }

    /// Returns the content size, including boundary slots when active.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.base.content_size()
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.base.scroll_offset()
    }

    /// Returns the frame of a window slot.
    #[must_use]
    pub fn frame(&self, window_index: usize) -> Rect {
        self.base.frame(window_index)
    }

    /// Replaces the item count and factory.
    ///
    /// When active, the base recycler sees `item_count + 2` slots, the factory
    /// receives original item indices, and the scroll offset is reset to one
    /// page in, so the first real item rests in the viewport with the mirrored
    /// last item to its left.
    pub fn reload<F>(&mut self, item_count: usize, mut factory: F) -> Result<(), CarouselError>
    where
        F: FnMut(&mut V, usize) -> Result<(), PrepareError> + 'static,
    {
        if item_count < MIN_ITEMS_FOR_WRAPAROUND {
            self.base.reload(item_count, factory)?;
            self.original_count = item_count;
            return Ok(());
        }

        let slots = item_count
            .checked_add(BOUNDARY_SLOTS)
            .ok_or(CarouselError::ItemCountOverflow(item_count))?;
        self.base.reload(slots, move |view, window_index| {
            factory(view, remap_index(window_index, item_count))
        })?;
        self.original_count = item_count;
        self.base.set_scroll_offset(self.base.item_width());
        Ok(())
    }

    /// Returns the raw window page under the leading edge of the viewport.
    #[must_use]
    pub fn infinite_page_index(&self) -> usize {
        self.base.page_index()
    }

    /// Returns the logical page the user sees, stable across boundary snaps.
    #[must_use]
    pub fn normalized_page_index(&self) -> usize {
        let page = self.infinite_page_index();
        if self.is_active() {
            remap_index(page, self.original_count)
        } else {
            page
        }
    }

    /// Returns the offset a pass at `offset` should actually lay out at.
    ///
    /// - At or past the right boundary (`offset + item_width >= content_width`)
    ///   the offset becomes `content_width - offset`.
    /// - Before the left boundary (`offset < 0`) it becomes
    ///   `content_width - 2 * item_width`.
    ///
    /// Inactive adapters return `offset` unchanged.
    #[must_use]
    pub fn reconcile_scroll_boundary(&self, offset: f64) -> f64 {
        if !self.is_active() {
            return offset;
        }
        let content_width = self.base.content_size().width;
        let item_width = self.base.item_width();
        if offset + item_width >= content_width {
            content_width - offset
        } else if offset < 0.0 {
            content_width - BOUNDARY_SLOTS as f64 * item_width
        } else {
            offset
        }
    }

    /// Rewrites the window requested at the two boundary cases.
    ///
    /// With `s` slots, a request for `[0, 0]` becomes `[s - 2, s - 1]` and a
    /// request for `[s - 1, s]` becomes `[0, 1]`. Other windows, and every
    /// window while inactive, pass through.
    #[must_use]
    pub fn adjust_window(&self, window: Window) -> Window {
        if !self.is_active() {
            return window;
        }
        let slots = isize::try_from(self.base.item_count()).unwrap_or(isize::MAX);
        let boundary = BOUNDARY_SLOTS as isize;
        if window.first == 0 && window.last == 0 {
            Window::new(slots - boundary, slots - 1)
        } else if window.first == slots - 1 && window.last == slots {
            Window::new(0, 1)
        } else {
            window
        }
    }

    /// Runs a layout pass: boundary snap, then windowing and reconciliation.
    ///
    /// [`LayoutPass::scroll_offset`] carries the snapped offset, which the host
    /// must adopt before painting.
    pub fn layout(&mut self, offset: f64, viewport: Size) -> LayoutPass {
        let requested = self.base.begin_pass(offset, viewport);
        let offset = self.reconcile_scroll_boundary(requested);
        let snapped = offset != requested;
        if snapped {
            log::debug!("wrapped scroll offset {requested} to {offset}");
        }
        self.base.set_scroll_offset(offset);

        let window = self.adjust_window(
            self.base
                .compute_window(offset, self.base.viewport().width),
        );
        let reconciled = self.base.reconcile(window);
        LayoutPass {
            scroll_offset: offset,
            snapped,
            window,
            reconciled,
        }
    }

    /// Requests a scroll of one page forward.
    pub fn scroll_to_next(&mut self, animated: bool) -> ScrollRequest {
        self.base.scroll_to_next(animated)
    }

    /// Returns the visible window slots in ascending order.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        self.base.visible_indices()
    }

    /// Returns the instance in a visible window slot.
    #[must_use]
    pub fn view_at(&self, window_index: usize) -> Option<&V> {
        self.base.view_at(window_index)
    }

    /// Returns the identity of the instance in a visible window slot.
    #[must_use]
    pub fn view_id_at(&self, window_index: usize) -> Option<ViewId> {
        self.base.view_id_at(window_index)
    }
}
