use indexmap::map::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt::Debug;
use std::fmt::Formatter;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

// Keys are plain positions (no per-arena check value) so they can be written to and read from
//   netlist files. Files are validated before use, see `netlist::validate`.
#[macro_export]
macro_rules! new_index_type {
    ($vis:vis $name:ident) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name($crate::util::arena::Idx);

        // trick to make the imports not leak outside of the macro
        const _: () = {
            use $crate::util::arena::IndexType;
            use $crate::util::arena::Idx;

            impl IndexType for $name {
                fn new(idx: Idx) -> Self {
                    Self(idx)
                }
                fn inner(&self) -> Idx {
                    self.0
                }
            }

            impl std::fmt::Debug for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "<{} {}>", stringify!($name), self.0.index())
                }
            }
        };
    };
}

pub trait IndexType: Sized + Debug + Copy + Eq + Hash {
    fn new(idx: Idx) -> Self;
    fn inner(&self) -> Idx;

    fn index(&self) -> usize {
        self.inner().index()
    }

    /// Key for entries that are counted but not stored in an arena, e.g. nexuses.
    fn from_index(index: usize) -> Self {
        Self::new(Idx { index })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Idx {
    index: usize,
}

impl Idx {
    pub fn index(&self) -> usize {
        self.index
    }
}

pub struct Arena<K: IndexType, T> {
    values: Vec<T>,
    ph: PhantomData<K>,
}

impl<K: IndexType, T> Arena<K, T> {
    pub fn new() -> Self {
        Self {
            values: vec![],
            ph: PhantomData,
        }
    }

    pub fn push(&mut self, value: T) -> K {
        let key = K::new(Idx {
            index: self.values.len(),
        });
        self.values.push(value);
        key
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `key` points to a value in this arena.
    /// Keys read from files must be checked with this before indexing.
    pub fn contains_key(&self, key: K) -> bool {
        key.index() < self.values.len()
    }

    pub fn get(&self, key: K) -> Option<&T> {
        self.values.get(key.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.into_iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + Clone + '_ {
        (0..self.values.len()).map(|index| K::new(Idx { index }))
    }
}

impl<K: IndexType, T> Index<K> for Arena<K, T> {
    type Output = T;
    fn index(&self, index: K) -> &Self::Output {
        match self.values.get(index.index()) {
            Some(value) => value,
            None => panic!(
                "Arena index {:?} out of bounds for arena of length {}",
                index,
                self.values.len()
            ),
        }
    }
}

impl<K: IndexType, T> IndexMut<K> for Arena<K, T> {
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        let len = self.values.len();
        match self.values.get_mut(index.index()) {
            Some(value) => value,
            None => panic!("Arena index {:?} out of bounds for arena of length {}", index, len),
        }
    }
}

impl<K: IndexType, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexType, T: Clone> Clone for Arena<K, T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            ph: PhantomData,
        }
    }
}

impl<K: IndexType, T: Debug> Debug for Arena<K, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let map: IndexMap<_, _> = self.iter().collect();
        map.fmt(f)
    }
}

impl<K: IndexType, T: Serialize> Serialize for Arena<K, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de, K: IndexType, T: Deserialize<'de>> Deserialize<'de> for Arena<K, T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        Ok(Arena {
            values,
            ph: PhantomData,
        })
    }
}

pub struct ArenaIteratorRef<'s, K, T> {
    inner: std::iter::Enumerate<std::slice::Iter<'s, T>>,
    ph: PhantomData<K>,
}

impl<'s, K: IndexType, T> IntoIterator for &'s Arena<K, T> {
    type Item = (K, &'s T);
    type IntoIter = ArenaIteratorRef<'s, K, T>;

    fn into_iter(self) -> Self::IntoIter {
        ArenaIteratorRef {
            inner: self.values.iter().enumerate(),
            ph: PhantomData,
        }
    }
}

impl<'s, K: IndexType, T: 's> Iterator for ArenaIteratorRef<'s, K, T> {
    type Item = (K, &'s T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(index, value)| (K::new(Idx { index }), value))
    }
}
