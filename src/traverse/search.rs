//! Short-circuiting traversals: `find`, `some` and `every`.

use super::container::{Container, Element, Key, Source};
use super::stream;
use crate::control::not;
use crate::flow::{Flow, any_true};

/// Returns the first entry, in iteration order, for which `predicate` holds.
///
/// A synchronous match returns at once. Once a predicate is pending, later
/// entries are tested only after the earlier ones settled, so a later match
/// never overtakes an earlier pending one. `None` when nothing matches.
///
/// # Examples
///
/// ```rust
/// use flowless::flow::Flow;
/// use flowless::traverse::{Container, find};
///
/// let numbers: Container<i32> = Container::from(vec![1, 2, 5, 7, 10, 11]);
/// let found = find(|value: &i32, _| Flow::ready(*value > 5), numbers);
/// assert_eq!(found.ok(), Some(Some(7)));
/// ```
pub fn find<T, K, E, F>(predicate: F, container: Container<T, K, E>) -> Flow<Option<T>, E>
where
    T: Element,
    K: Element,
    E: Send + 'static,
    F: Fn(&T, &Key<K>) -> Flow<bool, E> + Send + 'static,
{
    let mut entries = match container.into_source() {
        Source::Stream(source) => return stream::find(source, predicate),
        Source::Finite { entries, .. } => entries,
    };

    while let Some((key, value)) = entries.next() {
        match predicate(&value, &key) {
            Flow::Ready(true) => return Flow::Ready(Some(value)),
            Flow::Ready(false) => {}
            Flow::Failed(error) => return Flow::Failed(error),
            Flow::Pending(condition) => {
                tracing::trace!("predicate pending, testing the remaining entries in order");
                return Flow::pending(async move {
                    if condition.await? {
                        return Ok(Some(value));
                    }
                    for (key, value) in entries {
                        let condition = predicate(&value, &key);
                        if condition.await? {
                            return Ok(Some(value));
                        }
                    }
                    Ok(None)
                });
            }
        }
    }
    Flow::Ready(None)
}

/// Returns `true` if `predicate` holds for at least one entry.
///
/// Stops at the first synchronous `true`. Pending predicates race: the first
/// one resolving to `true` decides, and `false` needs every predicate to be
/// known false. Streams are tested chunk by chunk.
pub fn some<T, K, E, F>(predicate: F, container: Container<T, K, E>) -> Flow<bool, E>
where
    T: Element,
    K: Element,
    E: Send + 'static,
    F: Fn(&T, &Key<K>) -> Flow<bool, E> + Send + 'static,
{
    match container.into_source() {
        Source::Stream(source) => stream::some(source, predicate),
        Source::Finite { entries, .. } => any_true(entries.map(|(key, value)| predicate(&value, &key))),
    }
}

/// Returns `true` if `predicate` holds for every entry.
///
/// Defined as `not(some(not(predicate)))`, so it short-circuits on the
/// first entry known to fail the predicate.
///
/// # Examples
///
/// ```rust
/// use flowless::flow::Flow;
/// use flowless::traverse::{Container, every};
///
/// let numbers: Container<i32> = Container::from(vec![2, 4, 6]);
/// assert_eq!(every(|value: &i32, _| Flow::ready(value % 2 == 0), numbers).ok(), Some(true));
/// ```
pub fn every<T, K, E, F>(predicate: F, container: Container<T, K, E>) -> Flow<bool, E>
where
    T: Element,
    K: Element,
    E: Send + 'static,
    F: Fn(&T, &Key<K>) -> Flow<bool, E> + Send + 'static,
{
    not(some(move |value: &T, key: &Key<K>| not(predicate(value, key)), container))
}
