//! Bounded LRU map.
//!
//! A hash index over an arena of nodes threaded into a doubly-linked list.
//! The head is the least recently used entry, the tail the most recent.
//! Both `get` and `put` move the touched node to the tail; eviction takes
//! the head. Evicted slots are reused in place, so the arena never grows
//! past the capacity.

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

/// Index into the node arena.
type NodeIndex = usize;

/// Null link.
const NIL: NodeIndex = usize::MAX;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: NodeIndex,
    next: NodeIndex,
}

/// Access-ordered map holding at most `capacity` entries.
#[derive(Debug)]
pub struct LruMap<K, V> {
    index: HashMap<K, NodeIndex>,
    nodes: Vec<Node<K, V>>,
    head: NodeIndex,
    tail: NodeIndex,
    capacity: usize,
}

impl<K, V> LruMap<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a map holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::with_table_size(capacity, capacity)
    }

    /// Create a map with the hash index pre-sized to `table_size` slots.
    pub fn with_table_size(capacity: usize, table_size: usize) -> Self {
        Self {
            index: HashMap::with_capacity(table_size),
            nodes: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get a value and mark it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_tail(idx);
        Some(&self.nodes[idx].value)
    }

    /// Look at a value without touching its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.nodes[idx].value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or overwrite, marking the key most recently used.
    ///
    /// Returns the entry pushed out to stay within capacity, if any. With a
    /// capacity of zero the given entry itself is handed straight back.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return Some((key, value));
        }

        if let Some(&idx) = self.index.get(&key) {
            self.nodes[idx].value = value;
            self.move_to_tail(idx);
            return None;
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: NIL,
            next: NIL,
        };

        if self.nodes.len() < self.capacity {
            let idx = self.nodes.len();
            self.nodes.push(node);
            self.index.insert(key, idx);
            self.push_tail(idx);
            return None;
        }

        // Full: recycle the least recently used slot.
        let idx = self.head;
        self.unlink(idx);
        let evicted = mem::replace(&mut self.nodes[idx], node);
        self.index.remove(&evicted.key);
        self.index.insert(key, idx);
        self.push_tail(idx);
        Some((evicted.key, evicted.value))
    }

    /// Remove all entries. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    fn move_to_tail(&mut self, idx: NodeIndex) {
        if idx == self.tail {
            return;
        }
        self.unlink(idx);
        self.push_tail(idx);
    }

    fn unlink(&mut self, idx: NodeIndex) {
        let (prev, next) = {
            let node = &self.nodes[idx];
            (node.prev, node.next)
        };

        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }

        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }

        let node = &mut self.nodes[idx];
        node.prev = NIL;
        node.next = NIL;
    }

    fn push_tail(&mut self, idx: NodeIndex) {
        self.nodes[idx].prev = self.tail;
        self.nodes[idx].next = NIL;

        if self.tail == NIL {
            self.head = idx;
        } else {
            self.nodes[self.tail].next = idx;
        }
        self.tail = idx;
    }
}

/// Iterator over keys in recency order, least recent first.
pub struct Keys<'a, K, V> {
    nodes: &'a [Node<K, V>],
    cursor: NodeIndex,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.nodes[self.cursor];
        self.cursor = node.next;
        Some(&node.key)
    }
}
