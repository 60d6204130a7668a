use std::hash::Hash;

use fnv::FnvHashMap;

/// Thin wrapper around an FNV keyed hash map, used for small integer keys
/// (dimensions, indexes) where SipHash is unnecessary.
pub struct Map<K, V>(pub FnvHashMap<K, V>);

impl<K: Eq + Hash, V> Map<K, V> {
    pub fn new() -> Self {
        Self(FnvHashMap::<K, V>::default())
    }

    pub fn insert(&mut self, k: K, data: V) -> Option<V> {
        self.0.insert(k, data)
    }

    pub fn get(&self, k: &K) -> Option<&V> {
        self.0.get(k)
    }

    pub fn get_mut(&mut self, k: &K) -> Option<&mut V> {
        self.0.get_mut(k)
    }

    /// Returns the value stored at k, inserting `f()` first if absent.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, k: K, f: F) -> &mut V {
        self.0.entry(k).or_insert_with(f)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }
}

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_insert_with_inserts_once() {
        let mut map: Map<(usize, usize), Vec<u64>> = Map::new();
        map.get_or_insert_with((4, 2), Vec::new).push(1);
        map.get_or_insert_with((4, 2), || vec![7]).push(2);
        assert_eq!(map.get(&(4, 2)), Some(&vec![1, 2]));
        assert_eq!(map.len(), 1);
    }
}
