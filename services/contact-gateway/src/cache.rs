// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bounded key/value store with per-entry TTL and LRU eviction.
//!
//! Entries live in a slot vector threaded by an index-linked recency list
//! (head = most recently touched, tail = least). A hash map points each key
//! at its slot, so lookups, recency bumps and evictions are O(1).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    expires_at: Instant,
    prev: usize,
    next: usize,
}

/// LRU cache whose entries also expire `ttl` after their last write.
#[derive(Debug)]
pub struct LruTtlCache<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    capacity: usize,
    ttl: Duration,
}

impl<K, V> LruTtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity,
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry and mark it most recently used.
    ///
    /// An entry whose TTL has lapsed is dropped and reported as absent.
    pub fn get<Q>(&mut self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        if self.slots[idx].expires_at <= now {
            self.release(idx);
            return None;
        }
        self.detach(idx);
        self.push_front(idx);
        Some(&self.slots[idx].value)
    }

    /// Store `value` with a fresh TTL and mark it most recently used.
    ///
    /// Returns the key evicted to stay within capacity, if any.
    pub fn insert(&mut self, key: K, value: V, now: Instant) -> Option<K> {
        let expires_at = now + self.ttl;

        if let Some(&idx) = self.index.get(&key) {
            let slot = &mut self.slots[idx];
            slot.value = value;
            slot.expires_at = expires_at;
            self.detach(idx);
            self.push_front(idx);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let slot = Slot {
            key: key.clone(),
            value,
            expires_at,
            prev: NIL,
            next: NIL,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.push_front(idx);
        self.index.insert(key, idx);

        evicted
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        let mut cursor = self.tail;
        while cursor != NIL {
            let prev = self.slots[cursor].prev;
            if self.slots[cursor].expires_at <= now {
                self.release(cursor);
                removed += 1;
            }
            cursor = prev;
        }
        removed
    }

    fn evict_lru(&mut self) -> Option<K> {
        let idx = self.tail;
        if idx == NIL {
            return None;
        }
        let key = self.slots[idx].key.clone();
        self.release(idx);
        Some(key)
    }

    fn release(&mut self, idx: usize) {
        self.detach(idx);
        self.index.remove(&self.slots[idx].key);
        self.free.push(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }
        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        self.slots[idx].prev = NIL;
        self.slots[idx].next = old_head;
        if old_head == NIL {
            self.tail = idx;
        } else {
            self.slots[old_head].prev = idx;
        }
        self.head = idx;
    }

    #[cfg(test)]
    fn keys_by_recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while cursor != NIL {
            keys.push(self.slots[cursor].key.clone());
            cursor = self.slots[cursor].next;
        }
        keys
    }
}
