//! Player inventory
//!
//! A bounded list of item ids. Adding a held item or adding past capacity
//! does nothing.

use log::{debug, warn};

pub const DEFAULT_CAPACITY: usize = 8;

/// Items carried by the player, in pickup order (removal may reorder)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<u8>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Inventory {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn has(&self, item: u8) -> bool {
        self.items.contains(&item)
    }

    /// Add an item. Already-held items and a full inventory are no-ops.
    pub fn add(&mut self, item: u8) {
        if self.has(item) {
            debug!("Item {} already held", item);
            return;
        }
        if self.items.len() >= self.capacity {
            warn!("Inventory full ({}), dropping item {}", self.capacity, item);
            return;
        }
        self.items.push(item);
    }

    /// Remove an item if held; the last item moves into its slot
    pub fn remove(&mut self, item: u8) {
        if let Some(pos) = self.items.iter().position(|&i| i == item) {
            self.items.swap_remove(pos);
        }
    }

    pub fn items(&self) -> &[u8] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
