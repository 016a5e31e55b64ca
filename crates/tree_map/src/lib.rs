use std::cmp::Ordering;

use rbtree::{Comparator, NaturalOrder, RbTree};

pub use rbtree::EmptyStructureError;

/// Ordered map backed by a red-black tree of `(key, value)` entries.
///
/// - Keys are unique under the configured comparator; `insert` overwrites the
///   existing value and returns the old one.
/// - Iteration is in ascending key order.
pub struct TreeMap<K, V, C = NaturalOrder> {
    cmp: C,
    tree: RbTree<Entry<K, V>, EntryOrder<C>>,
}

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Orders entries by their key component only, so the stored value never
/// participates in comparisons.
struct EntryOrder<C> {
    cmp: C,
}

impl<K, V, C: Comparator<K>> Comparator<Entry<K, V>> for EntryOrder<C> {
    fn compare(&self, a: &Entry<K, V>, b: &Entry<K, V>) -> Ordering {
        self.cmp.compare(&a.key, &b.key)
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    pub fn with_comparator(cmp: C) -> Self
    where
        C: Clone,
    {
        Self {
            cmp: cmp.clone(),
            tree: RbTree::with_comparator(EntryOrder { cmp }),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.tree.insert(Entry { key, value }).map(|e| e.value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree
            .get_by(|e| self.cmp.compare(&e.key, key))
            .map(|e| &e.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree
            .take_by(|e| self.cmp.compare(&e.key, key))
            .map(|e| e.value)
    }

    pub fn first_key(&self) -> Result<&K, EmptyStructureError> {
        self.tree.min().map(|e| &e.key)
    }

    pub fn last_key(&self) -> Result<&K, EmptyStructureError> {
        self.tree.max().map(|e| &e.key)
    }

    pub fn first_key_value(&self) -> Result<(&K, &V), EmptyStructureError> {
        self.tree.min().map(|e| (&e.key, &e.value))
    }

    pub fn last_key_value(&self) -> Result<(&K, &V), EmptyStructureError> {
        self.tree.max().map(|e| (&e.key, &e.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.iter() {
            f(key, value);
        }
    }
}

impl<K: Ord, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, C: Comparator<K>> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// Ascending `(key, value)` cursor.
pub struct Iter<'a, K, V> {
    inner: rbtree::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
