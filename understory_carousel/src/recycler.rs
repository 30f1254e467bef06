// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The windowing and recycling engine.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use smallvec::SmallVec;

use crate::config::validate_item_width;
use crate::store::ViewStore;
use crate::window::{compute_window, floor_div};
use crate::{
    CarouselConfig, CarouselError, ItemFactory, ItemView, PrepareError, ViewId, Window,
};

/// What a single reconciliation changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Instances moved from the visible set into the reuse pool.
    pub evicted: usize,
    /// Indices that entered the visible set.
    pub inserted: usize,
    /// Indices in range that could not be prepared this pass.
    pub skipped: SmallVec<[usize; 2]>,
}

/// Report of one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPass {
    /// Scroll offset the pass was laid out at.
    ///
    /// Hosts must adopt this value: wraparound may have rewritten the offset
    /// they passed in.
    pub scroll_offset: f64,
    /// Whether the offset was snapped back across a wraparound boundary.
    pub snapped: bool,
    /// Window that was reconciled.
    pub window: Window,
    /// Changes to the visible set.
    pub reconciled: Reconciled,
}

/// A request to move the scroll offset, produced by
/// [`WindowedRecycler::scroll_to_next`].
///
/// Non-animated requests have already been applied to the stored offset.
/// Animated requests are left to the host's animation facility, which then
/// drives layout passes with intermediate offsets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollRequest {
    /// Offset when the request was made.
    pub from: f64,
    /// Target offset.
    pub to: f64,
    /// Whether the host should animate towards `to`.
    pub animated: bool,
}

/// Fixed-width horizontal pager that recycles content instances.
///
/// The recycler owns every instance it creates. On each layout pass it
/// computes the window of indices touched by the viewport, moves instances that
/// left the window into a reuse pool, and configures pooled (or new) instances
/// for indices that entered it.
///
/// Item `i` occupies `[i * item_width, (i + 1) * item_width)` horizontally and
/// spans the full viewport height.
pub struct WindowedRecycler<V> {
    item_width: f64,
    item_count: usize,
    viewport: Size,
    scroll_offset: f64,
    content_size: Size,
    store: ViewStore<V>,
    visible: HashMap<usize, ViewId>,
    pool: Vec<ViewId>,
    factory: Option<ItemFactory<V>>,
    pool_limit: Option<usize>,
    invalidated: bool,
    geometry_dirty: bool,
}

impl<V: ItemView> WindowedRecycler<V> {
    /// Creates an empty recycler.
    ///
    /// Only `item_width` and `pool_limit` are read from `config`.
    pub fn new(config: CarouselConfig) -> Result<Self, CarouselError> {
        validate_item_width(config.item_width)?;
        Ok(Self {
            item_width: config.item_width,
            item_count: 0,
            viewport: Size::ZERO,
            scroll_offset: 0.0,
            content_size: Size::ZERO,
            store: ViewStore::new(),
            visible: HashMap::new(),
            pool: Vec::new(),
            factory: None,
            pool_limit: config.pool_limit,
            invalidated: false,
            geometry_dirty: false,
        })
    }

    /// Returns the page width.
    #[must_use]
    pub fn item_width(&self) -> f64 {
        self.item_width
    }

    /// Sets the page width.
    ///
    /// Content size is recomputed immediately; frames of visible instances are
    /// refreshed on the next pass.
    pub fn set_item_width(&mut self, width: f64) -> Result<(), CarouselError> {
        validate_item_width(width)?;
        if self.item_width != width {
            self.item_width = width;
            self.geometry_dirty = true;
            self.update_content_size();
        }
        Ok(())
    }

    /// Returns the number of items laid out, including any synthetic slots.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Returns the total scrollable size: `item_width * item_count` by the
    /// viewport height.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Returns the viewport size seen by the last layout pass.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Returns the scroll offset of the last layout pass or scroll request.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Replaces the stored scroll offset. Non-finite values are ignored.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.scroll_offset = offset;
        } else {
            log::warn!("ignoring non-finite scroll offset {offset}");
        }
    }

    /// Replaces the item count and factory.
    ///
    /// The visible set is left alone until the next pass, which evicts every
    /// visible instance and refills the window through the new factory.
    pub fn reload<F>(&mut self, item_count: usize, factory: F) -> Result<(), CarouselError>
    where
        F: FnMut(&mut V, usize) -> Result<(), PrepareError> + 'static,
    {
        if isize::try_from(item_count).is_err() {
            return Err(CarouselError::ItemCountOverflow(item_count));
        }
        self.item_count = item_count;
        self.factory = Some(Box::new(factory));
        self.invalidated = true;
        self.update_content_size();
        log::debug!("reloaded carousel with {item_count} items");
        Ok(())
    }

    /// Returns `true` if the next layout pass has pending work regardless of
    /// scroll movement (after a reload or a geometry change).
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.invalidated || self.geometry_dirty
    }

    /// Returns the frame of `index` in content coordinates.
    #[must_use]
    pub fn frame(&self, index: usize) -> Rect {
        frame_for(index, self.item_width, self.viewport.height)
    }

    /// Computes the window of indices touched by a viewport at `offset`.
    #[must_use]
    pub fn compute_window(&self, offset: f64, viewport_width: f64) -> Window {
        compute_window(offset, viewport_width, self.item_width)
    }

    /// Returns the page under the leading edge of the viewport.
    ///
    /// Negative offsets report page `0`.
    #[must_use]
    pub fn page_index(&self) -> usize {
        usize::try_from(floor_div(self.scroll_offset, self.item_width)).unwrap_or(0)
    }

    /// Runs a full layout pass at `offset` for a viewport of `viewport` size.
    ///
    /// A non-finite offset keeps the previous offset and negative or
    /// non-finite viewport extents are treated as zero; both are logged. The
    /// pass itself never fails.
    pub fn layout(&mut self, offset: f64, viewport: Size) -> LayoutPass {
        let offset = self.begin_pass(offset, viewport);
        self.scroll_offset = offset;
        let window = self.compute_window(offset, self.viewport.width);
        let reconciled = self.reconcile(window);
        LayoutPass {
            scroll_offset: offset,
            snapped: false,
            window,
            reconciled,
        }
    }

    /// Requests a scroll of one page forward.
    ///
    /// See [`ScrollRequest`] for how animated and immediate requests differ.
    pub fn scroll_to_next(&mut self, animated: bool) -> ScrollRequest {
        let from = self.scroll_offset;
        let to = from + self.item_width;
        if !animated {
            self.scroll_offset = to;
        }
        ScrollRequest { from, to, animated }
    }

    /// Brings the visible set in line with `window`.
    ///
    /// 1. Visible indices outside the window are detached into the pool.
    /// 2. Visible entries whose instance is also pooled are purged.
    /// 3. Every index in the window below the item count that is not visible
    ///    gets a pooled instance (or a new one when the pool is empty),
    ///    configured by the factory, framed, and attached.
    ///
    /// Factory failures skip the index and are reported in
    /// [`Reconciled::skipped`].
    pub fn reconcile(&mut self, window: Window) -> Reconciled {
        let mut reconciled = Reconciled::default();

        if mem::take(&mut self.invalidated) {
            reconciled.evicted += self.evict_where(|_| true);
        }
        reconciled.evicted += self.evict_where(|index| !window.contains(index));
        self.purge_pooled_from_visible();
        if mem::take(&mut self.geometry_dirty) {
            self.reframe_visible();
        }

        for index in window.indices(self.item_count) {
            if self.visible.contains_key(&index) {
                continue;
            }
            match self.insert_view(index) {
                Ok(()) => reconciled.inserted += 1,
                Err(err) => {
                    log::warn!("skipping index {index} this pass: {err}");
                    reconciled.skipped.push(index);
                }
            }
        }

        if let Some(limit) = self.pool_limit {
            self.trim_pool(limit);
        }

        log::trace!(
            "reconciled window {}..={}: {} evicted, {} inserted, {} skipped, {} pooled",
            window.first,
            window.last,
            reconciled.evicted,
            reconciled.inserted,
            reconciled.skipped.len(),
            self.pool.len()
        );
        reconciled
    }

    /// Returns the number of visible instances.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Returns the visible window indices in ascending order.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.visible.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Iterates visible `(window index, instance)` pairs in no particular order.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &V)> + '_ {
        self.visible
            .iter()
            .filter_map(|(&index, &id)| self.store.get(id).map(|view| (index, view)))
    }

    /// Calls `f` with every visible `(window index, instance)` pair.
    pub fn for_each_visible_mut(&mut self, mut f: impl FnMut(usize, &mut V)) {
        for (&index, &id) in &self.visible {
            if let Some(view) = self.store.get_mut(id) {
                f(index, view);
            }
        }
    }

    /// Returns the identity of the instance showing `index`, if visible.
    #[must_use]
    pub fn view_id_at(&self, index: usize) -> Option<ViewId> {
        self.visible.get(&index).copied()
    }

    /// Returns the instance showing `index`, if visible.
    #[must_use]
    pub fn view_at(&self, index: usize) -> Option<&V> {
        self.view_id_at(index).and_then(|id| self.store.get(id))
    }

    /// Returns the instance behind `id`, visible or pooled.
    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<&V> {
        self.store.get(id)
    }

    /// Returns the identities of pooled instances.
    #[must_use]
    pub fn pooled_ids(&self) -> &[ViewId] {
        &self.pool
    }

    /// Returns the number of pooled instances.
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Returns how many instances have ever been created.
    #[must_use]
    pub fn instantiated_count(&self) -> usize {
        self.store.instantiated()
    }

    /// Returns how many instances are alive (visible plus pooled).
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.store.live()
    }

    /// Returns the pool limit, if any.
    #[must_use]
    pub fn pool_limit(&self) -> Option<usize> {
        self.pool_limit
    }

    /// Sets or clears the pool limit, trimming the pool right away.
    pub fn set_pool_limit(&mut self, limit: Option<usize>) {
        self.pool_limit = limit;
        if let Some(limit) = limit {
            self.trim_pool(limit);
        }
    }

    /// Drops pooled instances until at most `keep` remain.
    ///
    /// Returns the number of instances dropped. Their [`ViewId`]s become stale.
    pub fn trim_pool(&mut self, keep: usize) -> usize {
        if self.pool.len() <= keep {
            return 0;
        }
        let dropped = self.pool.len() - keep;
        for id in self.pool.drain(keep..) {
            self.store.remove(id);
        }
        log::debug!("trimmed {dropped} pooled views, {keep} kept");
        dropped
    }

    /// Applies viewport metrics for a pass and returns the usable offset.
    pub(crate) fn begin_pass(&mut self, offset: f64, viewport: Size) -> f64 {
        let viewport = Size::new(
            clamp_extent(viewport.width, "width"),
            clamp_extent(viewport.height, "height"),
        );
        if self.viewport.height != viewport.height {
            self.geometry_dirty = true;
        }
        self.viewport = viewport;
        self.update_content_size();

        if offset.is_finite() {
            offset
        } else {
            log::warn!(
                "ignoring non-finite scroll offset {offset}, keeping {}",
                self.scroll_offset
            );
            self.scroll_offset
        }
    }

    fn update_content_size(&mut self) {
        let width = self.item_width * self.item_count as f64;
        self.content_size = Size::new(width, self.viewport.height);
    }

    fn evict_where(&mut self, mut predicate: impl FnMut(usize) -> bool) -> usize {
        let evicted: SmallVec<[ViewId; 8]> = self
            .visible
            .extract_if(|&index, _| predicate(index))
            .map(|(_, id)| id)
            .collect();
        for &id in &evicted {
            if let Some(view) = self.store.get_mut(id) {
                view.set_attached(false);
            }
            self.pool.push(id);
        }
        evicted.len()
    }

    fn purge_pooled_from_visible(&mut self) {
        if self.pool.is_empty() {
            return;
        }
        let before = self.visible.len();
        let pool = &self.pool;
        self.visible.retain(|_, id| !pool.contains(id));
        let purged = before - self.visible.len();
        debug_assert_eq!(
            purged, 0,
            "instances were present in both the visible set and the reuse pool"
        );
        if purged > 0 {
            log::warn!("purged {purged} pooled views from the visible set");
        }
    }

    fn reframe_visible(&mut self) {
        let (width, height) = (self.item_width, self.viewport.height);
        for (&index, &id) in &self.visible {
            if let Some(view) = self.store.get_mut(id) {
                view.set_frame(frame_for(index, width, height));
            }
        }
    }

    fn insert_view(&mut self, index: usize) -> Result<(), PrepareError> {
        let frame = self.frame(index);
        let Some(factory) = self.factory.as_mut() else {
            return Err(PrepareError::new("no item factory"));
        };
        let id = match self.pool.pop() {
            Some(id) => id,
            None => self.store.insert(V::default()),
        };
        let Some(view) = self.store.get_mut(id) else {
            return Err(PrepareError::new("pooled view is gone"));
        };
        if let Err(err) = factory(view, index) {
            self.pool.push(id);
            return Err(err);
        }
        view.set_frame(frame);
        view.set_attached(true);
        self.visible.insert(index, id);
        Ok(())
    }
}

impl<V> fmt::Debug for WindowedRecycler<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowedRecycler")
            .field("item_width", &self.item_width)
            .field("item_count", &self.item_count)
            .field("viewport", &self.viewport)
            .field("scroll_offset", &self.scroll_offset)
            .field("content_size", &self.content_size)
            .field("visible", &self.visible)
            .field("pool", &self.pool)
            .field("has_factory", &self.factory.is_some())
            .field("pool_limit", &self.pool_limit)
            .finish_non_exhaustive()
    }
}

fn frame_for(index: usize, item_width: f64, height: f64) -> Rect {
    let x = index as f64 * item_width;
    Rect::from_origin_size((x, 0.0), (item_width, height))
}

fn clamp_extent(value: f64, axis: &str) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("viewport {axis} {value} is not a non-negative extent, using 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Rect, Size};

    use super::WindowedRecycler;
    use crate::{CarouselConfig, CarouselError, ItemView, PrepareError, Window};

    #[derive(Debug, Default)]
    struct Tile {
        frame: Rect,
        attached: bool,
        index: Option<usize>,
    }

    impl ItemView for Tile {
        fn frame(&self) -> Rect {
            self.frame
        }

        fn set_frame(&mut self, frame: Rect) {
            self.frame = frame;
        }

        fn set_attached(&mut self, attached: bool) {
            self.attached = attached;
        }
    }

    fn recycler(count: usize) -> WindowedRecycler<Tile> {
        let mut recycler = WindowedRecycler::new(CarouselConfig::new(100.0)).unwrap();
        recycler
            .reload(count, |tile: &mut Tile, index| {
                tile.index = Some(index);
                Ok(())
            })
            .unwrap();
        recycler
    }

    const VIEWPORT: Size = Size::new(100.0, 50.0);

    #[test]
    fn rejects_bad_item_width() {
        assert!(matches!(
            WindowedRecycler::<Tile>::new(CarouselConfig::new(0.0)),
            Err(CarouselError::InvalidItemWidth(_))
        ));

        let mut recycler = recycler(3);
        assert_eq!(
            recycler.set_item_width(-1.0),
            Err(CarouselError::InvalidItemWidth(-1.0))
        );
        assert_eq!(recycler.item_width(), 100.0);
    }

    #[test]
    fn reload_recomputes_content_size() {
        let mut recycler = recycler(4);
        assert_eq!(recycler.content_size().width, 400.0);
        recycler.layout(0.0, VIEWPORT);
        assert_eq!(recycler.content_size(), Size::new(400.0, 50.0));

        recycler.set_item_width(50.0).unwrap();
        assert_eq!(recycler.content_size(), Size::new(200.0, 50.0));
        assert!(recycler.needs_layout());
    }

    #[test]
    fn layout_fills_window_and_frames_items() {
        let mut recycler = recycler(5);
        let pass = recycler.layout(150.0, VIEWPORT);

        assert_eq!(pass.window, Window::new(1, 2));
        assert_eq!(pass.reconciled.inserted, 2);
        assert_eq!(recycler.visible_indices(), vec![1, 2]);

        let tile = recycler.view_at(2).unwrap();
        assert_eq!(tile.index, Some(2));
        assert!(tile.attached);
        assert_eq!(tile.frame, Rect::new(200.0, 0.0, 300.0, 50.0));
        assert_eq!(recycler.frame(2), tile.frame);
    }

    #[test]
    fn evicted_views_are_detached_and_reused() {
        let mut recycler = recycler(10);
        recycler.layout(0.0, VIEWPORT);
        let first = recycler.view_id_at(0).unwrap();

        let pass = recycler.layout(500.0, VIEWPORT);
        assert_eq!(pass.reconciled.evicted, 2);
        assert_eq!(pass.reconciled.inserted, 2);
        assert_eq!(recycler.instantiated_count(), 2);
        assert_eq!(recycler.pool_len(), 0);
        assert!(recycler.view(first).unwrap().attached);
    }

    #[test]
    fn factory_failure_skips_index_and_keeps_instance() {
        let mut recycler = WindowedRecycler::<Tile>::new(CarouselConfig::new(100.0)).unwrap();
        let pass = recycler.layout(0.0, VIEWPORT);
        assert!(pass.reconciled.skipped.is_empty(), "no items, nothing to skip");

        // Item count without a factory cannot be reached through the public
        // API, so a failing factory stands in for an unusable result.
        recycler
            .reload(2, |_: &mut Tile, _| Err(PrepareError::new("offline")))
            .unwrap();
        let pass = recycler.layout(0.0, VIEWPORT);
        assert_eq!(pass.reconciled.skipped.as_slice(), &[0, 1]);
        assert_eq!(recycler.visible_len(), 0);
        // The one instance created went back to the pool and was reused.
        assert_eq!(recycler.instantiated_count(), 1);
        assert_eq!(recycler.pool_len(), 1);
    }

    #[test]
    fn pool_limit_drops_excess_instances() {
        let mut recycler = recycler(10);
        recycler.layout(0.0, Size::new(400.0, 50.0));
        assert_eq!(recycler.visible_len(), 5);

        recycler.layout(0.0, Size::new(50.0, 50.0));
        assert_eq!(recycler.pool_len(), 4);
        let pooled: Vec<_> = recycler.pooled_ids().to_vec();

        recycler.set_pool_limit(Some(1));
        assert_eq!(recycler.pool_len(), 1);
        assert_eq!(recycler.live_count(), 2);
        let stale = pooled.iter().filter(|id| recycler.view(**id).is_none()).count();
        assert_eq!(stale, 3);

        assert_eq!(recycler.trim_pool(0), 1);
        assert_eq!(recycler.trim_pool(0), 0);
    }

    #[test]
    fn configured_pool_limit_is_enforced_every_pass() {
        let config = CarouselConfig::new(100.0).with_pool_limit(Some(1));
        let mut recycler = WindowedRecycler::new(config).unwrap();
        recycler
            .reload(20, |tile: &mut Tile, index| {
                tile.index = Some(index);
                Ok(())
            })
            .unwrap();

        recycler.layout(0.0, Size::new(400.0, 50.0));
        assert_eq!(recycler.visible_len(), 5);
        let shown: Vec<_> = (1..5).filter_map(|i| recycler.view_id_at(i)).collect();

        recycler.layout(0.0, Size::new(50.0, 50.0));
        assert_eq!(recycler.visible_len(), 1);
        assert_eq!(recycler.pool_len(), 1);
        assert_eq!(recycler.live_count(), recycler.visible_len() + 1);
        let stale = shown.iter().filter(|id| recycler.view(**id).is_none()).count();
        assert_eq!(stale, 3);
        assert!(recycler.view(recycler.pooled_ids()[0]).is_some());
    }

    #[test]
    fn oversized_reload_keeps_previous_state() {
        let mut recycler = recycler(3);
        recycler.layout(0.0, VIEWPORT);
        let size = recycler.content_size();

        assert_eq!(
            recycler.reload(usize::MAX, |_: &mut Tile, _| Ok(())),
            Err(CarouselError::ItemCountOverflow(usize::MAX))
        );
        assert_eq!(recycler.item_count(), 3);
        assert_eq!(recycler.content_size(), size);
        assert!(!recycler.needs_layout());
    }

    #[test]
    fn bad_viewport_extents_clamp_to_zero() {
        let mut recycler = recycler(3);
        let pass = recycler.layout(0.0, Size::new(-5.0, f64::NAN));
        assert_eq!(recycler.viewport(), Size::ZERO);
        assert_eq!(pass.window, Window::new(0, 0));
        assert_eq!(recycler.frame(0).height(), 0.0);
        assert_eq!(recycler.content_size(), Size::new(300.0, 0.0));
        assert_eq!(recycler.visible_indices(), vec![0]);
    }

    #[test]
    fn non_finite_offset_keeps_previous_offset() {
        let mut recycler = recycler(5);
        recycler.layout(200.0, VIEWPORT);
        let pass = recycler.layout(f64::NAN, VIEWPORT);
        assert_eq!(pass.scroll_offset, 200.0);
        assert_eq!(recycler.visible_indices(), vec![2, 3]);
    }

    #[test]
    fn viewport_height_change_reframes_visible_items() {
        let mut recycler = recycler(3);
        recycler.layout(0.0, VIEWPORT);
        recycler.layout(0.0, Size::new(100.0, 80.0));
        assert_eq!(
            recycler.view_at(0).unwrap().frame,
            Rect::new(0.0, 0.0, 100.0, 80.0)
        );
    }

    #[test]
    fn scroll_to_next_applies_immediate_requests_only() {
        let mut recycler = recycler(5);
        recycler.layout(100.0, VIEWPORT);

        let request = recycler.scroll_to_next(true);
        assert_eq!((request.from, request.to), (100.0, 200.0));
        assert_eq!(recycler.scroll_offset(), 100.0);

        let request = recycler.scroll_to_next(false);
        assert_eq!(request.to, 200.0);
        assert_eq!(recycler.scroll_offset(), 200.0);
        assert_eq!(recycler.page_index(), 2);
    }
}
