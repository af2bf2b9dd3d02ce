use std::{
    borrow::Borrow,
    fmt::Display,
    hash::Hash,
    num::NonZeroUsize,
};

use tracing::{
    debug,
    trace,
};

use crate::{
    CacheError,
    Entries,
    IntoIter,
    Keys,
    Result,
    Values,
    linked_hashmap::LinkedHashMap,
};

/// A fixed-capacity least-recently-used (Lru) cache.
///
/// Entries are kept in recency order, from the most recently used (the
/// head) to the least recently used (the tail). [`get`](Self::get),
/// [`get_mut`](Self::get_mut), [`get_or_insert_with`](Self::get_or_insert_with)
/// and [`put`](Self::put) move the touched entry to the head. When a new key
/// is put into a full cache, the tail entry is evicted first. Read-only
/// queries ([`has`](Self::has), [`peek`](Self::peek), [`lru`](Self::lru),
/// [`mru`](Self::mru) and iteration) never reorder anything.
///
/// # Time Complexity
/// - Get/Put/Delete: O(1) average
/// - Has/Peek: O(1) average
/// - Pop/Lru/Mru: O(1)
/// - Keys/Values/Entries/Clear: O(n)
///
/// # Examples
///
/// ```
/// use recency::Lru;
///
/// let mut cache = Lru::try_new(3)?;
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.put("c", 3);
///
/// cache.get(&"a"); // Mark as recently used
/// cache.put("d", 4); // Evicts "b"
///
/// assert_eq!(cache.keys().copied().collect::<Vec<_>>(), ["d", "a", "c"]);
/// # Ok::<(), recency::CacheError>(())
/// ```
#[derive(Clone)]
pub struct Lru<K, V> {
    map: LinkedHashMap<K, V>,
    capacity: NonZeroUsize,
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for Lru<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lru")
            .field("capacity", &self.capacity)
            .field("entries", &self.map)
            .finish()
    }
}

impl<K, V> Lru<K, V> {
    /// Creates a new, empty cache holding at most `capacity` entries.
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::Lru;
    ///
    /// let cache: Lru<i32, String> = Lru::new(NonZeroUsize::new(100).unwrap());
    /// assert_eq!(cache.max_size(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: NonZeroUsize) -> Self {
        debug!(capacity = capacity.get(), "Creating Lru cache");
        Self {
            map: LinkedHashMap::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Creates a new, empty cache from an integer capacity of any type.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero,
    /// negative, or does not fit in a `usize`. No cache is built in that case.
    ///
    /// ```rust
    /// use recency::{
    ///     CacheError,
    ///     Lru,
    /// };
    ///
    /// let cache = Lru::<&str, u32>::try_new(8).unwrap();
    /// assert_eq!(cache.max_size(), 8);
    ///
    /// assert!(matches!(
    ///     Lru::<&str, u32>::try_new(-1),
    ///     Err(CacheError::InvalidCapacity { .. })
    /// ));
    /// ```
    pub fn try_new<C>(capacity: C) -> Result<Self>
    where
        C: TryInto<usize> + Display + Copy,
    {
        capacity
            .try_into()
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self::new)
            .ok_or_else(|| CacheError::InvalidCapacity {
                requested: capacity.to_string(),
            })
    }

    /// Returns the number of entries currently cached.
    pub fn size(&self) -> usize {
        self.map.len()
    }

    /// Returns the fixed maximum number of entries.
    pub fn max_size(&self) -> usize {
        self.capacity.get()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes all entries. The capacity is unchanged.
    pub fn clear(&mut self) {
        debug!(dropped = self.map.len(), "Clearing Lru cache");
        self.map.clear();
    }

    /// Returns the least recently used entry, the next one to be evicted,
    /// without touching it.
    pub fn lru(&self) -> Option<(&K, &V)> {
        self.map.back().map(|index| self.map.entry_at(index))
    }

    /// Returns the most recently used entry without touching it.
    pub fn mru(&self) -> Option<(&K, &V)> {
        self.map.front().map(|index| self.map.entry_at(index))
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        self.map.pop_back()
    }

    /// Keeps only the entries for which `keep` returns `true`. Surviving
    /// entries keep their relative order.
    pub fn retain(&mut self, keep: impl FnMut(&K, &mut V) -> bool) {
        let removed = self.map.retain(keep);
        trace!(removed, size = self.map.len(), "Retained Lru entries");
    }

    /// Returns the keys from most to least recently used.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.map.iter(),
        }
    }

    /// Returns the values from most to least recently used.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.map.iter(),
        }
    }

    /// Returns the key-value pairs from most to least recently used.
    ///
    /// The cache is borrowed for as long as the iterator lives, so the order
    /// it reports cannot change underneath it.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            inner: self.map.iter(),
        }
    }

    /// Releases spare capacity held by the index and the node arena.
    pub fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit();
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let evicted = self.map.pop_back();
        if evicted.is_some() {
            trace!(size = self.map.len(), "Evicted least recently used entry");
        }
        evicted
    }
}

impl<K: Hash + Eq, V> Lru<K, V> {
    /// Returns the value for `key` and marks it as most recently used.
    ///
    /// A missing key is not an error: the result is `None` and the cache is
    /// left untouched.
    ///
    /// ```rust
    /// use recency::Lru;
    ///
    /// let mut cache = Lru::try_new(2)?;
    /// cache.put(1, "one");
    /// cache.put(2, "two");
    ///
    /// assert_eq!(cache.get(&1), Some(&"one"));
    /// assert_eq!(cache.get(&3), None);
    /// assert_eq!(cache.mru(), Some((&1, &"one")));
    /// # Ok::<(), recency::CacheError>(())
    /// ```
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.map.find(key)?;
        self.map.move_to_front(index);
        Some(self.map.value(index))
    }

    /// Like [`get`](Self::get), but returns a mutable reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.map.find(key)?;
        self.map.move_to_front(index);
        Some(self.map.value_mut(index))
    }

    /// Returns the value for `key` without changing its position.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.find(key).map(|index| self.map.value(index))
    }

    /// Returns `true` if `key` is cached. Unlike [`get`](Self::get), this
    /// never changes the recency order.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.find(key).is_some()
    }

    /// Inserts or updates `key` and marks it as most recently used.
    ///
    /// Updating an existing key replaces its value and never evicts. Putting
    /// a new key into a full cache first evicts the least recently used
    /// entry, which is returned.
    ///
    /// ```rust
    /// use recency::Lru;
    ///
    /// let mut cache = Lru::try_new(2)?;
    /// assert_eq!(cache.put(1, "one"), None);
    /// assert_eq!(cache.put(2, "two"), None);
    /// assert_eq!(cache.put(1, "uno"), None);
    /// assert_eq!(cache.put(3, "three"), Some((2, "two")));
    /// assert_eq!(cache.size(), 2);
    /// # Ok::<(), recency::CacheError>(())
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let hash = self.map.hash_key(&key);
        if let Some(index) = self.map.find_hashed(hash, &key) {
            *self.map.value_mut(index) = value;
            self.map.move_to_front(index);
            return None;
        }

        let evicted = self.make_room();
        self.map.push_front_hashed(hash, key, value);
        evicted
    }

    /// Returns the value for `key`, inserting `or_insert(&key)` first if it
    /// is missing. Either way the entry becomes the most recently used.
    ///
    /// ```rust
    /// use recency::Lru;
    ///
    /// let mut cache = Lru::<u32, String>::try_new(4)?;
    /// let value = cache.get_or_insert_with(7, |key| format!("item-{key}"));
    /// assert_eq!(value, "item-7");
    ///
    /// // The closure is not called for a cached key.
    /// let value = cache.get_or_insert_with(7, |_| unreachable!());
    /// assert_eq!(value, "item-7");
    /// # Ok::<(), recency::CacheError>(())
    /// ```
    pub fn get_or_insert_with(&mut self, key: K, or_insert: impl FnOnce(&K) -> V) -> &V {
        let hash = self.map.hash_key(&key);
        let index = match self.map.find_hashed(hash, &key) {
            Some(index) => {
                self.map.move_to_front(index);
                index
            }
            None => {
                let value = or_insert(&key);
                self.make_room();
                self.map.push_front_hashed(hash, key, value)
            }
        };
        self.map.value(index)
    }

    /// Removes `key` if present and returns its value. The order of the
    /// remaining entries is unchanged.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key).map(|(_, value)| value)
    }

    /// Removes `key` if present. Returns whether anything was removed.
    ///
    /// ```rust
    /// use recency::Lru;
    ///
    /// let mut cache = Lru::try_new(2)?;
    /// cache.put("a", 1);
    ///
    /// assert!(cache.delete(&"a"));
    /// assert!(!cache.delete(&"a"));
    /// assert!(cache.is_empty());
    /// # Ok::<(), recency::CacheError>(())
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key).is_some()
    }

    /// Validates the index and recency list against each other. This is
    /// **expensive** and only meant for debugging.
    #[cfg(all(debug_assertions, feature = "internal-debugging"))]
    #[doc(hidden)]
    pub fn debug_validate(&self) {
        assert!(
            self.map.len() <= self.capacity.get(),
            "Size {} exceeds capacity {}",
            self.map.len(),
            self.capacity
        );
        self.map.debug_validate();
    }

    fn make_room(&mut self) -> Option<(K, V)> {
        if self.map.len() < self.capacity.get() {
            return None;
        }
        self.evict()
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for Lru<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> IntoIterator for Lru<K, V> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'c, K, V> IntoIterator for &'c Lru<K, V> {
    type IntoIter = Entries<'c, K, V>;
    type Item = (&'c K, &'c V);

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}
