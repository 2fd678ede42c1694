//! Layer change notifications
//!
//! Mutating operations on a [`crate::TileGridLayer`] emit paired
//! before/after events, synchronously and on the calling thread, so
//! observers (selection overlays, renderers, command recorders) always see
//! a consistent pre/post pair. Handlers must not re-enter the mutating
//! operation that is currently dispatching.

use crate::coord::{TileCoord, TileRegion};
use crate::tile::Tile;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A change to a grid layer.
///
/// The `-ing` variants fire before the mutation, the `-ed` variants after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerEvent {
    TileAdding { coord: TileCoord, tile: Tile },
    TileAdded { coord: TileCoord, tile: Tile },
    TileRemoving { coord: TileCoord, tile: Tile },
    TileRemoved { coord: TileCoord, tile: Tile },
    CellClearing { coord: TileCoord },
    CellCleared { coord: TileCoord },
    LayerResized { bounds: TileRegion },
}

/// Receives [`LayerEvent`]s from a layer it is registered with.
pub trait LayerObserver {
    fn layer_changed(&mut self, event: &LayerEvent);
}

/// A list of weakly-held observers.
///
/// Observers that have been dropped are pruned on the next notification.
/// Cloning a list yields an empty one: a cloned layer starts with no
/// observers of its own.
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<Weak<RefCell<dyn LayerObserver>>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Only a weak reference is held.
    pub fn add(&mut self, observer: &Rc<RefCell<dyn LayerObserver>>) {
        self.observers.push(Rc::downgrade(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Dispatch an event, dropping entries whose observers are gone.
    pub fn notify(&mut self, event: &LayerEvent) {
        self.observers.retain(|observer| {
            if let Some(observer) = observer.upgrade() {
                observer.borrow_mut().layer_changed(event);
                true
            } else {
                false
            }
        });
    }
}

impl Clone for ObserverList {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.observers.len())
            .finish()
    }
}
