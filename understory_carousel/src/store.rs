// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slab owning every content instance.

use alloc::vec::Vec;

/// Identity of a content instance owned by a carousel.
///
/// This is a small, copyable handle consisting of a slot index and a generation
/// counter. It stays stable while the instance moves between the visible set and
/// the reuse pool, and becomes stale once the instance is dropped by pool
/// trimming. A freed slot that is reused gets a higher generation, so a stale
/// `ViewId` never aliases a different instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewId(u32, u32);

impl ViewId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation of this handle.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

#[derive(Debug)]
struct Slot<V> {
    generation: u32,
    view: Option<V>,
}

#[derive(Debug)]
pub(crate) struct ViewStore<V> {
    slots: Vec<Slot<V>>,
    free: Vec<u32>,
    instantiated: usize,
}

impl<V> ViewStore<V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            instantiated: 0,
        }
    }

    /// Stores a freshly created instance and returns its handle.
    pub(crate) fn insert(&mut self, view: V) -> ViewId {
        self.instantiated += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.view = Some(view);
            return ViewId::new(idx, slot.generation);
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a carousel never holds anywhere near u32::MAX instances"
        )]
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            view: Some(view),
        });
        ViewId::new(idx, 1)
    }

    /// Drops the instance behind `id`, freeing its slot.
    pub(crate) fn remove(&mut self, id: ViewId) -> Option<V> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        let view = slot.view.take()?;
        self.free.push(id.0);
        Some(view)
    }

    pub(crate) fn get(&self, id: ViewId) -> Option<&V> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.view.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Option<&mut V> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.view.as_mut())
    }

    /// Total number of instances ever created.
    pub(crate) fn instantiated(&self) -> usize {
        self.instantiated
    }

    /// Number of instances currently alive.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
