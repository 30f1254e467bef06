// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallax displacement on top of [`WraparoundAdapter`].
//!
//! Each page is a [`ParallaxItem`]: an outer frame that pages with the scroll
//! offset, and inner content pinned to fill it whose x origin is displaced by
//!
//! ```text
//! (tempo / item_width) * (scroll_offset - index * item_width)
//! ```
//!
//! so the content drifts at a different rate than the paging.

use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::config::validate_tempo;
use crate::{
    CarouselConfig, CarouselError, ItemView, LayoutPass, PrepareError, ScrollRequest,
    WraparoundAdapter,
};

/// Outer container for one page of parallax content.
///
/// The inner content always has the outer frame's size. Only its horizontal
/// origin, relative to the outer frame, is changed by the parallax pass.
#[derive(Clone, Debug, Default)]
pub struct ParallaxItem<V> {
    frame: Rect,
    content_offset: f64,
    content: V,
}

impl<V: ItemView> ParallaxItem<V> {
    /// Returns the inner content.
    #[must_use]
    pub fn content(&self) -> &V {
        &self.content
    }

    /// Returns the inner content mutably.
    pub fn content_mut(&mut self) -> &mut V {
        &mut self.content
    }

    /// Returns the inner content's x origin relative to the outer frame.
    #[must_use]
    pub fn content_offset(&self) -> f64 {
        self.content_offset
    }

    /// Moves the inner content horizontally within the outer frame.
    pub fn set_content_offset(&mut self, offset: f64) {
        self.content_offset = offset;
        self.pin_content();
    }

    /// Resizes the outer frame, keeping its origin.
    pub fn set_size(&mut self, size: Size) {
        self.frame = Rect::from_origin_size(self.frame.origin(), size);
        self.pin_content();
    }

    fn pin_content(&mut self) {
        self.content.set_frame(Rect::from_origin_size(
            (self.content_offset, 0.0),
            self.frame.size(),
        ));
    }
}

impl<V: ItemView> ItemView for ParallaxItem<V> {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.pin_content();
    }

    fn set_attached(&mut self, attached: bool) {
        self.content.set_attached(attached);
    }
}

/// Wraparound pager whose pages show parallax-displaced content.
#[derive(Debug)]
pub struct ParallaxAdapter<V> {
    inner: WraparoundAdapter<ParallaxItem<V>>,
    tempo: f64,
}

impl<V: ItemView> ParallaxAdapter<V> {
    /// Creates an empty adapter using the config's item width and tempo.
    pub fn new(config: CarouselConfig) -> Result<Self, CarouselError> {
        config.validate()?;
        Ok(Self {
            inner: WraparoundAdapter::new(config)?,
            tempo: config.tempo,
        })
    }

    /// Returns the wrapped wraparound adapter.
    #[must_use]
    pub fn inner(&self) -> &WraparoundAdapter<ParallaxItem<V>> {
        &self.inner
    }

    /// Returns the wrapped wraparound adapter mutably.
    pub fn inner_mut(&mut self) -> &mut WraparoundAdapter<ParallaxItem<V>> {
        &mut self.inner
    }

    /// Returns the parallax tempo.
    #[must_use]
    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Sets the parallax tempo. Takes effect on the next pass.
    pub fn set_tempo(&mut self, tempo: f64) -> Result<(), CarouselError> {
        validate_tempo(tempo)?;
        self.tempo = tempo;
        Ok(())
    }

    /// Returns `tempo / item_width`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.tempo / self.inner.item_width()
    }

    /// Returns the content offset for window slot `index` at `scroll_offset`.
    #[must_use]
    pub fn content_offset_for(&self, index: usize, scroll_offset: f64) -> f64 {
        displacement(self.ratio(), scroll_offset, index, self.inner.item_width())
    }

    /// Returns the page width.
    #[must_use]
    pub fn item_width(&self) -> f64 {
        self.inner.item_width()
    }

    /// Sets the page width. The ratio follows on the next pass.
    pub fn set_item_width(&mut self, width: f64) -> Result<(), CarouselError> {
        self.inner.set_item_width(width)
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.inner.scroll_offset()
    }

    /// Returns the content size.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.inner.content_size()
    }

    /// Returns the frame of a window slot.
    #[must_use]
    pub fn frame(&self, window_index: usize) -> Rect {
        self.inner.frame(window_index)
    }

    /// Replaces the item count and the factory for inner content.
    pub fn reload<F>(&mut self, item_count: usize, mut factory: F) -> Result<(), CarouselError>
    where
        F: FnMut(&mut V, usize) -> Result<(), PrepareError> + 'static,
    {
        self.inner.reload(item_count, move |item, index| {
            factory(item.content_mut(), index)
        })
    }

    /// Runs a wraparound layout pass, then displaces and resizes every visible
    /// page.
    pub fn layout(&mut self, offset: f64, viewport: Size) -> LayoutPass {
        let pass = self.inner.layout(offset, viewport);

        let ratio = self.ratio();
        let item_width = self.inner.item_width();
        let size = Size::new(item_width, self.inner.base().viewport().height);
        let scroll_offset = pass.scroll_offset;
        self.inner
            .base_mut()
            .for_each_visible_mut(|index, item| {
                item.set_content_offset(displacement(ratio, scroll_offset, index, item_width));
                item.set_size(size);
            });
        pass
    }

    /// Requests a scroll of one page forward.
    pub fn scroll_to_next(&mut self, animated: bool) -> ScrollRequest {
        self.inner.scroll_to_next(animated)
    }

    /// Returns the logical page the user sees.
    #[must_use]
    pub fn normalized_page_index(&self) -> usize {
        self.inner.normalized_page_index()
    }

    /// Returns the raw window page.
    #[must_use]
    pub fn infinite_page_index(&self) -> usize {
        self.inner.infinite_page_index()
    }

    /// Returns the visible window slots in ascending order.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        self.inner.visible_indices()
    }

    /// Returns the page container in a visible window slot.
    #[must_use]
    pub fn item_at(&self, window_index: usize) -> Option<&ParallaxItem<V>> {
        self.inner.view_at(window_index)
    }
}

fn displacement(ratio: f64, scroll_offset: f64, index: usize, item_width: f64) -> f64 {
    ratio * (scroll_offset - index as f64 * item_width)
}
