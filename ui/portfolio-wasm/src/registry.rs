//! Numbered slots for host objects that the page logic refers to by handle.
//!
//! Handles are never reused, so a released handle stays dead even if the
//! same object is registered again later.

use std::collections::HashMap;

pub struct Registry<T> {
    next: u32,
    live: HashMap<u32, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next: 0,
            live: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn insert(&mut self, value: T) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        self.live.insert(id, value);
        id
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.live.get(&id)
    }

    /// Release `id`, handing back what it held.
    pub fn take(&mut self, id: u32) -> Option<T> {
        self.live.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}
