//! Shape-preserving traversals: `map`, `filter` and `sync`.

use super::container::{Container, Element, Key, Source, Unique};
use super::stream;
use crate::flow::{Flow, await_all};

/// Applies `proc` to every entry and rebuilds a container of the same shape.
///
/// - Every result ready: `Ready` with the new container.
/// - A result failed synchronously: the traversal stops and returns it.
/// - Otherwise: `Pending`, settling once every entry's result settled and
///   rejecting with the first rejection. The output keeps input order
///   whatever the completion order.
///
/// For a stream the result is `Ready` with a new stream driven by the
/// source: a chunk's pending transform pauses the source, and the first
/// failure is emitted once as an error item.
///
/// The output values must be [`Unique`] because a set or map input gives a
/// set or map output. Use [`map_sequence`] for values without `Hash`.
///
/// # Examples
///
/// ```rust
/// use flowless::flow::Flow;
/// use flowless::traverse::{Container, map};
///
/// let numbers: Container<i32> = Container::from(vec![1, 2, 3]);
/// let doubled = map(|value, _| Flow::ready(value * 2), numbers);
/// assert_eq!(doubled.ok(), Some(Container::from(vec![2, 4, 6])));
/// ```
pub fn map<T, U, K, E, F>(proc: F, container: Container<T, K, E>) -> Flow<Container<U, K, E>, E>
where
    T: Element,
    U: Unique,
    K: Unique,
    E: Send + 'static,
    F: Fn(T, &Key<K>) -> Flow<U, E> + Send + Sync + 'static,
{
    match container.into_source() {
        Source::Stream(source) => Flow::Ready(Container::Stream(stream::map(source, proc))),
        Source::Finite { shape, entries } => {
            map_entries(entries, &proc).map(move |entries| Container::assemble(shape, entries))
        }
    }
}

/// Keeps the entries for which `predicate` holds, in input order.
///
/// Synchronous `false` results drop their entry at once; the remaining
/// entries wait for their pending conditions together, and the container
/// materializes only after all of them settled.
///
/// # Examples
///
/// ```rust
/// use flowless::flow::Flow;
/// use flowless::traverse::{Container, filter};
///
/// let numbers: Container<i32> = Container::from(vec![7, -1, 6, -2, 8, 9, -4]);
/// let negatives = filter(|value: &i32, _| Flow::ready(*value < 0), numbers);
/// assert_eq!(negatives.ok(), Some(Container::from(vec![-1, -2, -4])));
/// ```
pub fn filter<T, K, E, F>(predicate: F, container: Container<T, K, E>) -> Flow<Container<T, K, E>, E>
where
    T: Unique,
    K: Unique,
    E: Send + 'static,
    F: Fn(&T, &Key<K>) -> Flow<bool, E> + Send + Sync + 'static,
{
    match container.into_source() {
        Source::Stream(source) => Flow::Ready(Container::Stream(stream::filter(source, predicate))),
        Source::Finite { shape, entries } => {
            keep_entries(entries, &predicate).map(move |kept| Container::assemble(shape, kept))
        }
    }
}

/// Resolves a container of flows into a container of their values.
///
/// Same shape and keys, same fan-in as [`map`]: the first synchronous
/// failure is returned at once, otherwise the result settles when every
/// entry did and rejects with the first rejection. A stream of flows becomes
/// a stream of values, each chunk awaited before the next is pulled.
///
/// # Examples
///
/// ```rust
/// use flowless::flow::Flow;
/// use flowless::traverse::{Container, sync};
///
/// let flows: Container<Flow<i32>> = Container::mapping([("a", Flow::ready(1)), ("b", Flow::ready(2))]);
/// assert_eq!(sync(flows).ok(), Some(Container::mapping([("a", 1), ("b", 2)])));
/// ```
pub fn sync<T, K, E>(container: Container<Flow<T, E>, K, E>) -> Flow<Container<T, K, E>, E>
where
    T: Unique,
    K: Unique,
    E: Send + 'static,
{
    map(|flow, _| flow, container)
}

/// [`map`] for a plain sequence, without the [`Unique`] bound.
///
/// Callbacks see [`Key::Index`] keys, so they can be shared with `map`.
///
/// ```rust
/// use flowless::flow::Flow;
/// use flowless::traverse::map_sequence;
///
/// let halves = map_sequence(|value: f64, _| Flow::<f64>::ready(value / 2.0), vec![1.0, 3.0]);
/// assert_eq!(halves.ok(), Some(vec![0.5, 1.5]));
/// ```
pub fn map_sequence<T, U, E, F>(proc: F, items: Vec<T>) -> Flow<Vec<U>, E>
where
    T: Element,
    U: Element,
    E: Send + 'static,
    F: Fn(T, &Key) -> Flow<U, E>,
{
    let entries = items.into_iter().enumerate().map(|(index, value)| (Key::Index(index), value));
    map_entries(entries, &proc).map(|entries| entries.into_iter().map(|(_, value)| value).collect())
}

/// [`filter`] for a plain sequence, without the [`Unique`] bound.
pub fn filter_sequence<T, E, F>(predicate: F, items: Vec<T>) -> Flow<Vec<T>, E>
where
    T: Element,
    E: Send + 'static,
    F: Fn(&T, &Key) -> Flow<bool, E>,
{
    let entries = items.into_iter().enumerate().map(|(index, value)| (Key::Index(index), value));
    keep_entries(entries, &predicate).map(|kept| kept.into_iter().map(|(_, value)| value).collect())
}

fn map_entries<T, U, K, E, F, I>(entries: I, proc: &F) -> Flow<Vec<(Key<K>, U)>, E>
where
    U: Element,
    K: Element,
    E: Send + 'static,
    F: Fn(T, &Key<K>) -> Flow<U, E>,
    I: Iterator<Item = (Key<K>, T)>,
{
    let mut keys = Vec::new();
    let mut results = Vec::new();
    for (key, value) in entries {
        let result = proc(value, &key);
        if let Flow::Failed(error) = result {
            return Flow::Failed(error);
        }
        keys.push(key);
        results.push(result);
    }

    let outstanding = results.iter().filter(|result| result.is_pending()).count();
    if outstanding > 0 {
        tracing::trace!(outstanding, "map waiting on pending entries");
    }
    await_all(results).map(move |values| keys.into_iter().zip(values).collect())
}

fn keep_entries<T, K, E, F, I>(entries: I, predicate: &F) -> Flow<Vec<(Key<K>, T)>, E>
where
    T: Element,
    K: Element,
    E: Send + 'static,
    F: Fn(&T, &Key<K>) -> Flow<bool, E>,
    I: Iterator<Item = (Key<K>, T)>,
{
    let mut candidates = Vec::new();
    let mut conditions = Vec::new();
    for (key, value) in entries {
        match predicate(&value, &key) {
            Flow::Ready(false) => {}
            Flow::Failed(error) => return Flow::Failed(error),
            condition => {
                candidates.push((key, value));
                conditions.push(condition);
            }
        }
    }

    await_all(conditions).map(move |conditions| {
        candidates
            .into_iter()
            .zip(conditions)
            .filter_map(|(entry, keep)| keep.then_some(entry))
            .collect()
    })
}
