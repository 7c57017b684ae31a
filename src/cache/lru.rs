//! LRU Map Module
//!
//! Fixed-capacity map with least-recently-used eviction and O(1) operations.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Null link in the recency list.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    /// Neighbour closer to the head (more recently used)
    prev: usize,
    /// Neighbour closer to the tail (less recently used)
    next: usize,
}

// == LRU Map ==
/// Bounded key-value map ordered by recency of access.
///
/// Nodes live in a dense arena and are threaded into a doubly-linked list:
/// - Head = Most recently used
/// - Tail = Least recently used (next eviction candidate)
///
/// The `index` map gives O(1) lookup of a node; the links give O(1)
/// promotion and removal. Removing a node swaps the last arena slot into
/// the hole, so the arena never holds dead entries.
#[derive(Debug)]
pub struct LruMap<K, V> {
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruMap<K, V> {
    // == Constructor ==
    /// Creates an empty map holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            capacity,
        }
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss leaves the ordering untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.move_to_head(idx);
        Some(&self.nodes[idx].value)
    }

    /// Mutable variant of [`LruMap::get`], also promoting the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.move_to_head(idx);
        Some(&mut self.nodes[idx].value)
    }

    // == Peek ==
    /// Returns the value for `key` without changing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&idx| &self.nodes[idx].value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Put ==
    /// Inserts or overwrites `key`, making it most recently used.
    ///
    /// Overwriting never evicts. Inserting a new key into a full map first
    /// evicts the least recently used entry, which is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            self.nodes[idx].value = value;
            self.move_to_head(idx);
            return None;
        }

        let evicted = if self.nodes.len() >= self.capacity {
            self.pop_lru()
        } else {
            None
        };
        self.push_new(key, value);
        evicted
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        Some(self.remove_at(idx).value)
    }

    // == Evict ==
    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        if self.tail == NIL {
            return None;
        }
        let node = self.remove_at(self.tail);
        Some((node.key, node.value))
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        if self.tail == NIL {
            return None;
        }
        let node = &self.nodes[self.tail];
        Some((&node.key, &node.value))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    // == Internal Linking ==

    fn push_new(&mut self, key: K, value: V) {
        let idx = self.nodes.len();
        self.index.insert(key.clone(), idx);
        self.nodes.push(Node {
            key,
            value,
            prev: NIL,
            next: NIL,
        });
        self.push_front(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn move_to_head(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn remove_at(&mut self, idx: usize) -> Node<K, V> {
        self.unlink(idx);
        let last = self.nodes.len() - 1;
        let node = self.nodes.swap_remove(idx);

        // The node previously in the last slot now lives at `idx`
        if idx != last {
            let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
            if prev != NIL {
                self.nodes[prev].next = idx;
            } else {
                self.head = idx;
            }
            if next != NIL {
                self.nodes[next].prev = idx;
            } else {
                self.tail = idx;
            }
            if let Some(slot) = self.index.get_mut(&self.nodes[idx].key) {
                *slot = idx;
            }
        }

        self.index.remove(&node.key);
        node
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(self.nodes.len() <= self.capacity, "length exceeds capacity");
        assert_eq!(self.index.len(), self.nodes.len(), "index/arena size mismatch");

        let mut seen = 0;
        let mut prev = NIL;
        let mut cursor = self.head;
        while cursor != NIL {
            let node = &self.nodes[cursor];
            assert_eq!(node.prev, prev, "broken back link at slot {}", cursor);
            assert_eq!(self.index.get(&node.key), Some(&cursor), "index points elsewhere");
            seen += 1;
            assert!(seen <= self.nodes.len(), "cycle in recency list");
            prev = cursor;
            cursor = node.next;
        }
        assert_eq!(prev, self.tail, "tail is not the last node");
        assert_eq!(seen, self.nodes.len(), "unreachable nodes in arena");
    }
}

// == Iterator ==
/// Recency-ordered iterator returned by [`LruMap::iter`].
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    cursor: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.nodes[self.cursor];
        self.cursor = node.next;
        Some((&node.key, &node.value))
    }
}
