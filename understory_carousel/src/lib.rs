// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_carousel --heading-base-level=0

//! Understory Carousel: a horizontally paged, view-recycling carousel core.
//!
//! This crate decides which pages of a fixed-width horizontal pager must be on
//! screen for a given scroll offset, recycles content instances between pages
//! instead of rebuilding them, and computes each page's geometry. It is
//! renderer-agnostic: callers bring the content type and feed scroll offsets
//! and viewport sizes in from whatever scroll surface they use.
//!
//! Three layers build on each other by composition:
//!
//! - [`WindowedRecycler`]: owns every content instance, the visible set
//!   (window index → instance) and the reuse pool, and reconciles the visible
//!   set against the window `[floor(offset / w), floor((offset + viewport) / w)]`.
//! - [`WraparoundAdapter`]: for two or more items, pads the strip with a
//!   mirrored copy of the last item on the left and of the first item on the
//!   right, remaps slots back to item indices, and snaps the offset across the
//!   boundaries so scrolling loops forever.
//! - [`ParallaxAdapter`]: after each wraparound pass, displaces the inner
//!   content of every visible [`ParallaxItem`] by
//!   `tempo / w * (offset - index * w)`.
//!
//! Content types implement [`ItemView`]. A fresh instance comes from
//! `Default`; the item factory passed to `reload` configures an instance for a
//! logical index. Each instance has a stable [`ViewId`] while it moves between
//! the visible set and the pool.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_carousel::{CarouselConfig, ItemView, WraparoundAdapter};
//!
//! #[derive(Default)]
//! struct Card {
//!     frame: Rect,
//!     title: String,
//! }
//!
//! impl ItemView for Card {
//!     fn frame(&self) -> Rect {
//!         self.frame
//!     }
//!
//!     fn set_frame(&mut self, frame: Rect) {
//!         self.frame = frame;
//!     }
//! }
//!
//! let titles = ["one", "two", "three"];
//! let mut carousel = WraparoundAdapter::<Card>::new(CarouselConfig::new(320.0)).unwrap();
//! carousel
//!     .reload(titles.len(), move |card, index| {
//!         card.title = titles[index].to_string();
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! // Reload rests on the first real item, one boundary slot in.
//! let viewport = Size::new(320.0, 480.0);
//! let pass = carousel.layout(carousel.scroll_offset(), viewport);
//! assert_eq!(pass.scroll_offset, 320.0);
//! assert_eq!(carousel.normalized_page_index(), 0);
//!
//! // Paging past the last item wraps around to the first.
//! for _ in 0..titles.len() {
//!     let request = carousel.scroll_to_next(false);
//!     carousel.layout(request.to, viewport);
//! }
//! assert_eq!(carousel.normalized_page_index(), 0);
//! ```
//!
//! ## Driving a carousel
//!
//! Every pass is synchronous and runs to completion on the thread that owns the
//! carousel. Hosts call `layout` whenever the scroll offset or viewport
//! changes and must adopt [`LayoutPass::scroll_offset`], which differs from the
//! requested offset when wraparound snapped it. Animated page changes are
//! returned as a [`ScrollRequest`] for the host to animate; each animation
//! frame is then just another `layout` call.
//!
//! Factories that fail return a [`PrepareError`]; the index is skipped for that
//! pass, reported in [`Reconciled::skipped`], logged through the `log` facade,
//! and retried on the next pass that still covers it.
//!
//! The reuse pool grows to the largest window seen and is never shrunk unless
//! a pool limit is configured ([`CarouselConfig::with_pool_limit`]) or
//! [`WindowedRecycler::trim_pool`] is called.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod parallax;
mod recycler;
mod store;
mod view;
mod window;
mod wraparound;

pub use config::{CarouselConfig, DEFAULT_TEMPO};
pub use error::{CarouselError, PrepareError};
pub use parallax::{ParallaxAdapter, ParallaxItem};
pub use recycler::{LayoutPass, Reconciled, ScrollRequest, WindowedRecycler};
pub use store::ViewId;
pub use view::{ItemFactory, ItemView};
pub use window::{Window, compute_window};
pub use wraparound::{BOUNDARY_SLOTS, MIN_ITEMS_FOR_WRAPAROUND, WraparoundAdapter, remap_index};
