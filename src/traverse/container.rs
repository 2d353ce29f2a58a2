//! The container adapter registry.
//!
//! Every traversal is written once against three capabilities of a
//! container shape: create an empty result of the same shape, store a keyed
//! value into it, and visit all entries in order. [`Container`] is the sealed
//! set of supported shapes; [`Container::into_source`] inspects the variant
//! once per call and hands the traversal either an ordered entry iterator or
//! the push stream.

use std::fmt;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use super::stream::PushStream;
use crate::error::Error;

/// Values (and associative keys) a traversal can carry.
///
/// `Send + 'static` lets entries move into continuations.
pub trait Element: Send + 'static {}

impl<T: Send + 'static> Element for T {}

/// Elements that the set and associative-map shapes can store.
///
/// Traversals that rebuild a container (`map`, `filter`, `sync`) need it for
/// their output, since the output may have to be a set or a map.
pub trait Unique: Element + Eq + Hash {}

impl<T: Element + Eq + Hash> Unique for T {}

/// The shape of a [`Container`], without its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Ordered, index keyed.
    Sequence,
    /// String keyed, insertion ordered.
    Mapping,
    /// Unique values, visited in insertion order.
    UniqueSet,
    /// Unique keys of any hashable type, insertion ordered.
    AssocMap,
    /// Live, push driven, not indexable.
    Stream,
}

/// The key of an entry, handed to per-entry callbacks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key<K = String> {
    /// Position of the entry (sequences, sets, streams).
    Index(usize),
    /// Property name (mappings).
    Name(String),
    /// Key of an associative map entry.
    Entry(K),
}

impl<K> Key<K> {
    /// Returns the position if this is an index key.
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(_) | Self::Entry(_) => None,
        }
    }

    /// Returns the property name if this is a mapping key.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Index(_) | Self::Entry(_) => None,
        }
    }
}

/// A collection the traversal algorithms can work on.
///
/// # Examples
///
/// ```rust
/// use flowless::traverse::{Container, Shape};
///
/// let numbers: Container<i32> = Container::from(vec![1, 2, 3]);
/// assert_eq!(numbers.shape(), Shape::Sequence);
/// assert_eq!(numbers.len(), Some(3));
/// ```
pub enum Container<T, K = String, E = Error> {
    /// An ordered sequence.
    Sequence(Vec<T>),
    /// A string-keyed mapping.
    Mapping(IndexMap<String, T>),
    /// A set of unique values.
    UniqueSet(IndexSet<T>),
    /// A key-unique associative map.
    AssocMap(IndexMap<K, T>),
    /// A push stream.
    Stream(PushStream<T, E>),
}

impl<T, K, E> Container<T, K, E> {
    /// Returns the shape of this container.
    pub const fn shape(&self) -> Shape {
        match self {
            Self::Sequence(_) => Shape::Sequence,
            Self::Mapping(_) => Shape::Mapping,
            Self::UniqueSet(_) => Shape::UniqueSet,
            Self::AssocMap(_) => Shape::AssocMap,
            Self::Stream(_) => Shape::Stream,
        }
    }

    /// Number of entries, or `None` for streams.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Sequence(items) => Some(items.len()),
            Self::Mapping(entries) => Some(entries.len()),
            Self::UniqueSet(items) => Some(items.len()),
            Self::AssocMap(entries) => Some(entries.len()),
            Self::Stream(_) => None,
        }
    }

    /// Returns `true` if a finite container has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Builds a string-keyed mapping from `(name, value)` pairs.
    pub fn mapping<N, I>(entries: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, T)>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Inspects the variant once and exposes it to a traversal.
    pub(crate) fn into_source(self) -> Source<T, K, E> {
        let shape = self.shape();
        let entries = match self {
            Self::Sequence(items) => Entries::Sequence(items.into_iter().enumerate()),
            Self::Mapping(entries) => Entries::Mapping(entries.into_iter()),
            Self::UniqueSet(items) => Entries::UniqueSet(items.into_iter().enumerate()),
            Self::AssocMap(entries) => Entries::AssocMap(entries.into_iter()),
            Self::Stream(stream) => return Source::Stream(stream),
        };
        Source::Finite { shape, entries }
    }

    /// Returns the sequence, if this is one.
    pub fn into_sequence(self) -> Option<Vec<T>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mapping, if this is one.
    pub fn into_mapping(self) -> Option<IndexMap<String, T>> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the set, if this is one.
    pub fn into_unique_set(self) -> Option<IndexSet<T>> {
        match self {
            Self::UniqueSet(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the associative map, if this is one.
    pub fn into_assoc_map(self) -> Option<IndexMap<K, T>> {
        match self {
            Self::AssocMap(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the stream, if this is one.
    pub fn into_stream(self) -> Option<PushStream<T, E>> {
        match self {
            Self::Stream(stream) => Some(stream),
            _ => None,
        }
    }
}

impl<T: Unique, K: Unique, E: Send + 'static> Container<T, K, E> {
    /// Creates an empty container of the given shape.
    ///
    /// An empty stream is one that has already ended.
    pub fn empty(shape: Shape) -> Self {
        match shape {
            Shape::Sequence => Self::Sequence(Vec::new()),
            Shape::Mapping => Self::Mapping(IndexMap::new()),
            Shape::UniqueSet => Self::UniqueSet(IndexSet::new()),
            Shape::AssocMap => Self::AssocMap(IndexMap::new()),
            Shape::Stream => Self::Stream(PushStream::empty()),
        }
    }

    /// Creates a container of the given shape from keyed entries, in order.
    pub(crate) fn assemble<I>(shape: Shape, entries: I) -> Self
    where
        I: IntoIterator<Item = (Key<K>, T)>,
    {
        if shape == Shape::Stream {
            return Self::Stream(entries.into_iter().map(|(_, value)| value).collect());
        }
        let mut container = Self::empty(shape);
        for (key, value) in entries {
            container.store(key, value);
        }
        container
    }

    /// Stores one entry. Sequences and sets ignore the key; a key of the
    /// wrong kind for a keyed shape drops the entry.
    fn store(&mut self, key: Key<K>, value: T) {
        match (self, key) {
            (Self::Sequence(items), _) => items.push(value),
            (Self::UniqueSet(items), _) => {
                items.insert(value);
            }
            (Self::Mapping(entries), Key::Name(name)) => {
                entries.insert(name, value);
            }
            (Self::AssocMap(entries), Key::Entry(key)) => {
                entries.insert(key, value);
            }
            (Self::Mapping(_) | Self::AssocMap(_), _) => {
                tracing::warn!("dropping entry whose key does not fit the container");
            }
            (Self::Stream(_), _) => {
                tracing::warn!("entries cannot be stored into a live stream");
            }
        }
    }
}

/// A container opened for traversal.
pub(crate) enum Source<T, K, E> {
    /// Shapes with a finite, ordered set of entries.
    Finite { shape: Shape, entries: Entries<T, K> },
    /// A push stream, consumed chunk by chunk.
    Stream(PushStream<T, E>),
}

/// Owned entries of a finite container, in iteration order.
pub(crate) enum Entries<T, K> {
    Sequence(std::iter::Enumerate<std::vec::IntoIter<T>>),
    Mapping(indexmap::map::IntoIter<String, T>),
    UniqueSet(std::iter::Enumerate<indexmap::set::IntoIter<T>>),
    AssocMap(indexmap::map::IntoIter<K, T>),
}

impl<T, K> Iterator for Entries<T, K> {
    type Item = (Key<K>, T);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Sequence(items) => items.next().map(|(index, value)| (Key::Index(index), value)),
            Self::UniqueSet(items) => items.next().map(|(index, value)| (Key::Index(index), value)),
            Self::Mapping(entries) => entries.next().map(|(name, value)| (Key::Name(name), value)),
            Self::AssocMap(entries) => entries.next().map(|(key, value)| (Key::Entry(key), value)),
        }
    }
}

impl<T, K, E> From<Vec<T>> for Container<T, K, E> {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items)
    }
}

impl<T, K, E> From<IndexSet<T>> for Container<T, K, E> {
    fn from(items: IndexSet<T>) -> Self {
        Self::UniqueSet(items)
    }
}

impl<T, K, E> From<IndexMap<K, T>> for Container<T, K, E> {
    fn from(entries: IndexMap<K, T>) -> Self {
        Self::AssocMap(entries)
    }
}

impl<T, K, E> From<PushStream<T, E>> for Container<T, K, E> {
    fn from(stream: PushStream<T, E>) -> Self {
        Self::Stream(stream)
    }
}

impl<T, K, E> PartialEq for Container<T, K, E>
where
    T: Eq + Hash,
    K: Eq + Hash,
{
    /// Structural equality. Streams are never equal: their contents are only
    /// known by consuming them.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sequence(left), Self::Sequence(right)) => left == right,
            (Self::Mapping(left), Self::Mapping(right)) => left == right,
            (Self::UniqueSet(left), Self::UniqueSet(right)) => left == right,
            (Self::AssocMap(left), Self::AssocMap(right)) => left == right,
            _ => false,
        }
    }
}

impl<T: fmt::Debug, K: fmt::Debug, E> fmt::Debug for Container<T, K, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence(items) => formatter.debug_tuple("Sequence").field(items).finish(),
            Self::Mapping(entries) => formatter.debug_tuple("Mapping").field(entries).finish(),
            Self::UniqueSet(items) => formatter.debug_tuple("UniqueSet").field(items).finish(),
            Self::AssocMap(entries) => formatter.debug_tuple("AssocMap").field(entries).finish(),
            Self::Stream(stream) => formatter.debug_tuple("Stream").field(stream).finish(),
        }
    }
}
