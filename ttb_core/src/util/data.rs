use indexmap::map::Entry;
use indexmap::IndexMap;
use std::hash::Hash;

pub trait IndexMapExt<K, V> {
    /// The same as [IndexMap::insert], but asserts that the key is not already present.
    fn insert_first(&mut self, key: K, value: V) -> &mut V;
}

impl<K, V> IndexMapExt<K, V> for IndexMap<K, V>
where
    K: Eq + Hash,
{
    fn insert_first(&mut self, key: K, value: V) -> &mut V {
        match self.entry(key) {
            Entry::Occupied(_) => panic!("entry already exists"),
            Entry::Vacant(entry) => entry.insert(value),
        }
    }
}

pub trait VecExt<T> {
    /// Push `value` unless an equal element is already present, keeping insertion order.
    /// Returns whether the value was pushed.
    fn push_unique(&mut self, value: T) -> bool;
}

impl<T: PartialEq> VecExt<T> for Vec<T> {
    fn push_unique(&mut self, value: T) -> bool {
        if self.contains(&value) {
            false
        } else {
            self.push(value);
            true
        }
    }
}
