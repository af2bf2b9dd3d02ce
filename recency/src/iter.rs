use std::iter::FusedIterator;

use crate::linked_hashmap;

macro_rules! impl_borrowing_iter {
    ($name:ident<$lt:lifetime>, $item:ty, |$k:ident, $v:ident| $project:expr) => {
        impl<$lt, K, V> Iterator for $name<$lt, K, V> {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                self.inner.next().map(|($k, $v)| $project)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }
        }

        impl<K, V> DoubleEndedIterator for $name<'_, K, V> {
            fn next_back(&mut self) -> Option<Self::Item> {
                self.inner.next_back().map(|($k, $v)| $project)
            }
        }

        impl<K, V> ExactSizeIterator for $name<'_, K, V> {}

        impl<K, V> FusedIterator for $name<'_, K, V> {}

        impl<K, V> Clone for $name<'_, K, V> {
            fn clone(&self) -> Self {
                $name {
                    inner: self.inner.clone(),
                }
            }
        }

        impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for $name<'_, K, V> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_list().entries(self.clone()).finish()
            }
        }
    };
}

/// Entries of an [`Lru`](crate::Lru) from most to least recently used.
///
/// Returned by [`Lru::entries`](crate::Lru::entries). Walking the entries
/// does not promote them.
pub struct Entries<'c, K, V> {
    pub(crate) inner: linked_hashmap::Iter<'c, K, V>,
}

impl_borrowing_iter!(Entries<'c>, (&'c K, &'c V), |k, v| (k, v));

/// Keys of an [`Lru`](crate::Lru) from most to least recently used.
///
/// Returned by [`Lru::keys`](crate::Lru::keys).
pub struct Keys<'c, K, V> {
    pub(crate) inner: linked_hashmap::Iter<'c, K, V>,
}

impl_borrowing_iter!(Keys<'c>, &'c K, |k, _v| k);

/// Values of an [`Lru`](crate::Lru) from most to least recently used.
///
/// Returned by [`Lru::values`](crate::Lru::values).
pub struct Values<'c, K, V> {
    pub(crate) inner: linked_hashmap::Iter<'c, K, V>,
}

impl_borrowing_iter!(Values<'c>, &'c V, |_k, v| v);

/// Owning iterator over an [`Lru`](crate::Lru), most recently used first.
pub struct IntoIter<K, V> {
    pub(crate) inner: linked_hashmap::IntoIter<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
