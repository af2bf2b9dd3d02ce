use std::{
    borrow::Borrow,
    hash::{
        BuildHasher,
        Hash,
    },
    iter::FusedIterator,
};

use hashbrown::HashTable;
use slab::Slab;

use crate::RandomState;

mod links;

pub(crate) use links::{
    Links,
    Ptr,
};

/// Upper bound on the slots reserved up front; larger maps grow on demand.
const MAX_PREALLOCATED: usize = 1024;

#[derive(Debug, Clone)]
struct LLNode<K, T> {
    links: Links,
    hash: u64,
    key: K,
    value: T,
}

/// A hash index over an arena of doubly-linked nodes.
///
/// Nodes live in a [`Slab`], so a node is addressed by its slot index for as
/// long as it is alive and freed slots are handed out again by later
/// insertions. The index maps a key's hash to the slot holding it. The list
/// runs from the `head` sentinel (front, most recent) to the `tail` sentinel
/// (back, least recent); the sentinels only carry links.
#[derive(Clone)]
pub(crate) struct LinkedHashMap<K, T> {
    head: Links,
    tail: Links,
    nodes: Slab<LLNode<K, T>>,
    table: HashTable<usize>,
    hasher: RandomState,
}

impl<K: std::fmt::Debug, T: std::fmt::Debug> std::fmt::Debug for LinkedHashMap<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, T> Default for LinkedHashMap<K, T> {
    fn default() -> Self {
        LinkedHashMap {
            head: Links::empty(),
            tail: Links::empty(),
            nodes: Slab::new(),
            table: HashTable::new(),
            hasher: RandomState::default(),
        }
    }
}

impl<K, T> LinkedHashMap<K, T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_PREALLOCATED);
        LinkedHashMap {
            head: Links::empty(),
            tail: Links::empty(),
            nodes: Slab::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
            hasher: RandomState::default(),
        }
    }

    fn links_mut(&mut self, ptr: Ptr) -> &mut Links {
        match ptr {
            Ptr::Head => &mut self.head,
            Ptr::Tail => &mut self.tail,
            Ptr::Node(index) => &mut self.nodes[index].links,
        }
    }

    fn unlink(&mut self, index: usize) {
        let Links { prev, next } = self.nodes[index].links;
        self.links_mut(prev).next = next;
        self.links_mut(next).prev = prev;
    }

    fn link_front(&mut self, index: usize) {
        let first = self.head.next;
        self.nodes[index].links = Links::between(Ptr::Head, first);
        self.links_mut(first).prev = Ptr::Node(index);
        self.head.next = Ptr::Node(index);
    }

    pub(crate) fn move_to_front(&mut self, index: usize) {
        if self.head.next == Ptr::Node(index) {
            return;
        }
        self.unlink(index);
        self.link_front(index);
    }

    pub(crate) fn front(&self) -> Option<usize> {
        self.head.next.node()
    }

    pub(crate) fn back(&self) -> Option<usize> {
        self.tail.prev.node()
    }

    pub(crate) fn entry_at(&self, index: usize) -> (&K, &T) {
        let node = &self.nodes[index];
        (&node.key, &node.value)
    }

    pub(crate) fn value(&self, index: usize) -> &T {
        &self.nodes[index].value
    }

    pub(crate) fn value_mut(&mut self, index: usize) -> &mut T {
        &mut self.nodes[index].value
    }

    pub(crate) fn hash_key<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        BuildHasher::hash_one(&self.hasher, key)
    }

    /// Links a new node at the front of the list and indexes it under `hash`.
    ///
    /// The caller must have checked that no node with an equal key exists.
    pub(crate) fn push_front_hashed(&mut self, hash: u64, key: K, value: T) -> usize {
        let index = self.nodes.insert(LLNode {
            links: Links::empty(),
            hash,
            key,
            value,
        });
        let nodes = &self.nodes;
        self.table.insert_unique(hash, index, |&slot| nodes[slot].hash);
        self.link_front(index);
        index
    }

    #[track_caller]
    pub(crate) fn remove_at(&mut self, index: usize) -> (K, T) {
        self.unlink(index);
        let node = self.nodes.remove(index);
        match self.table.find_entry(node.hash, |&slot| slot == index) {
            Ok(occupied) => {
                occupied.remove();
            }
            Err(_) => unreachable!("Slot {index} is linked but not indexed"),
        }
        (node.key, node.value)
    }

    pub(crate) fn pop_front(&mut self) -> Option<(K, T)> {
        let index = self.front()?;
        Some(self.remove_at(index))
    }

    pub(crate) fn pop_back(&mut self) -> Option<(K, T)> {
        let index = self.back()?;
        Some(self.remove_at(index))
    }

    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
        self.nodes.clear();
        self.head = Links::empty();
        self.tail = Links::empty();
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        // Occupied slots cannot move, so the arena only gives back the space
        // past its highest live slot.
        let nodes = &self.nodes;
        self.table.shrink_to_fit(|&slot| nodes[slot].hash);
        self.nodes.shrink_to_fit();
    }

    /// Walks the list front to back, unlinking every node `keep` rejects.
    /// Returns how many nodes were removed.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&K, &mut T) -> bool) -> usize {
        let mut removed = 0;
        let mut ptr = self.head.next;
        while let Ptr::Node(index) = ptr {
            let node = &mut self.nodes[index];
            ptr = node.links.next;
            if !keep(&node.key, &mut node.value) {
                self.remove_at(index);
                removed += 1;
            }
        }
        removed
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, T> {
        Iter {
            front: self.head.next,
            back: self.tail.prev,
            remaining: self.len(),
            map: self,
        }
    }
}

impl<K: Hash + Eq, T> LinkedHashMap<K, T> {
    pub(crate) fn find_hashed<Q>(&self, hash: u64, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.table
            .find(hash, |&slot| self.nodes[slot].key.borrow() == key)
            .copied()
    }

    pub(crate) fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_hashed(self.hash_key(key), key)
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, T)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find(key)?;
        Some(self.remove_at(index))
    }

    #[cfg(all(debug_assertions, feature = "internal-debugging"))]
    pub(crate) fn debug_validate(&self) {
        assert_eq!(
            self.nodes.len(),
            self.table.len(),
            "Arena and index should have the same length"
        );
        assert_eq!(self.head.prev, Ptr::Head, "Head sentinel has no predecessor");
        assert_eq!(self.tail.next, Ptr::Tail, "Tail sentinel has no successor");

        let mut seen = 0;
        let mut prev = Ptr::Head;
        let mut ptr = self.head.next;
        while let Ptr::Node(index) = ptr {
            assert!(self.nodes.contains(index), "Dangling link to slot {index}");
            let node = &self.nodes[index];
            assert_eq!(node.links.prev, prev, "Broken back link at slot {index}");
            assert_eq!(
                BuildHasher::hash_one(&self.hasher, &node.key),
                node.hash,
                "Stale hash at slot {index}"
            );
            assert_eq!(
                self.find_hashed(node.hash, &node.key),
                Some(index),
                "Slot {index} is linked but not indexed"
            );
            seen += 1;
            assert!(seen <= self.len(), "Cycle in recency list");
            prev = ptr;
            ptr = node.links.next;
        }
        assert_eq!(ptr, Ptr::Tail, "Forward walk should end at the tail sentinel");
        assert_eq!(self.tail.prev, prev, "Tail sentinel should link to the last node");
        assert_eq!(seen, self.len(), "Every indexed node should be linked");
    }
}

impl<K, T> IntoIterator for LinkedHashMap<K, T> {
    type IntoIter = IntoIter<K, T>;
    type Item = (K, T);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { map: self }
    }
}

/// Borrowing front-to-back walk over the list.
pub(crate) struct Iter<'m, K, T> {
    front: Ptr,
    back: Ptr,
    remaining: usize,
    map: &'m LinkedHashMap<K, T>,
}

impl<K, T> Clone for Iter<'_, K, T> {
    fn clone(&self) -> Self {
        Iter {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            map: self.map,
        }
    }
}

impl<'m, K, T> Iterator for Iter<'m, K, T> {
    type Item = (&'m K, &'m T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front.node()?;
        let node = &self.map.nodes[index];
        self.front = node.links.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, T> DoubleEndedIterator for Iter<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back.node()?;
        let node = &self.map.nodes[index];
        self.back = node.links.prev;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, T> ExactSizeIterator for Iter<'_, K, T> {}

impl<K, T> FusedIterator for Iter<'_, K, T> {}

/// Owning front-to-back walk; each step unlinks the node it yields.
pub(crate) struct IntoIter<K, T> {
    map: LinkedHashMap<K, T>,
}

impl<K, T> Iterator for IntoIter<K, T> {
    type Item = (K, T);

    fn next(&mut self) -> Option<Self::Item> {
        self.map.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len(), Some(self.map.len()))
    }
}

impl<K, T> DoubleEndedIterator for IntoIter<K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map.pop_back()
    }
}

impl<K, T> ExactSizeIterator for IntoIter<K, T> {}

impl<K, T> FusedIterator for IntoIter<K, T> {}
