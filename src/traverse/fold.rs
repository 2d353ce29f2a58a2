//! Sequential traversals: `for_each` and `reduce`.

use std::fmt;
use std::sync::Arc;

use super::container::{Container, Element, Key, Source};
use super::stream;
use crate::error::Error;
use crate::flow::Flow;

/// Calls `proc` for every entry, in iteration order, for its side effects.
///
/// Finite containers are visited synchronously and yield `Ready(())`. A
/// stream yields a pending flow that resolves when the stream ends, or
/// rejects with the stream's error.
///
/// # Examples
///
/// ```rust
/// use flowless::traverse::{Container, for_each};
///
/// let numbers: Container<i32> = Container::from(vec![1, 2, 3]);
/// let visited = for_each(|value, _| println!("{value}"), numbers);
/// assert!(visited.is_ready());
/// ```
pub fn for_each<T, K, E, F>(mut proc: F, container: Container<T, K, E>) -> Flow<(), E>
where
    T: Element,
    K: Element,
    E: Send + 'static,
    F: FnMut(T, &Key<K>) + Send + 'static,
{
    match container.into_source() {
        Source::Stream(source) => stream::for_each(source, proc),
        Source::Finite { entries, .. } => {
            for (key, value) in entries {
                proc(value, &key);
            }
            Flow::Ready(())
        }
    }
}

/// Folds the entries into an accumulator, strictly in iteration order.
///
/// Each step sees the fully resolved accumulator of the previous one. While
/// every step is ready the fold runs synchronously; the first pending
/// accumulator (the seed included) serializes the remaining steps behind
/// it. A failure stops the fold.
///
/// # Examples
///
/// ```rust
/// use flowless::flow::Flow;
/// use flowless::traverse::{Container, range, reduce};
///
/// let numbers: Container<i64> = Container::from(range(1, 10));
/// let sum = reduce(|total, value, _| Flow::ready(total + value), Flow::ready(0), numbers);
/// assert_eq!(sum.ok(), Some(55));
/// ```
pub fn reduce<T, K, E, A, F>(proc: F, seed: Flow<A, E>, container: Container<T, K, E>) -> Flow<A, E>
where
    T: Element,
    K: Element,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(A, T, &Key<K>) -> Flow<A, E> + Send + 'static,
{
    let mut entries = match container.into_source() {
        Source::Stream(source) => return stream::reduce(source, proc, seed),
        Source::Finite { entries, .. } => entries,
    };

    let mut accumulator = seed;
    loop {
        match accumulator {
            Flow::Ready(value) => match entries.next() {
                Some((key, item)) => accumulator = proc(value, item, &key),
                None => return Flow::Ready(value),
            },
            Flow::Failed(error) => return Flow::Failed(error),
            Flow::Pending(deferred) => {
                tracing::trace!("accumulator pending, folding the remaining entries in order");
                return Flow::pending(async move {
                    let mut value = deferred.await?;
                    for (key, item) in entries {
                        let step = proc(value, item, &key);
                        value = step.await?;
                    }
                    Ok(value)
                });
            }
        }
    }
}

/// Like [`reduce`], but the seed is produced by `factory` from the container
/// itself, so every call starts from a fresh accumulator.
pub fn reduce_with<T, K, E, A, F, S>(proc: F, factory: S, container: Container<T, K, E>) -> Flow<A, E>
where
    T: Element,
    K: Element,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(A, T, &Key<K>) -> Flow<A, E> + Send + 'static,
    S: FnOnce(&Container<T, K, E>) -> Flow<A, E>,
{
    let seed = factory(&container);
    reduce(proc, seed, container)
}

type Step<T, A, K, E> = dyn Fn(A, T, &Key<K>) -> Flow<A, E> + Send + Sync;
type SeedFactory<T, A, K, E> = dyn Fn(&Container<T, K, E>) -> Flow<A, E> + Send + Sync;

/// A reusable fold configuration.
///
/// Holds a step function and a seed factory; every [`Reducer::apply`] asks
/// the factory for a new seed, so containers never share an accumulator.
///
/// # Examples
///
/// ```rust
/// use flowless::flow::Flow;
/// use flowless::traverse::{Container, Reducer};
///
/// let collect = Reducer::new(
///     |mut seen: Vec<i32>, value, _| {
///         seen.push(value);
///         Flow::ready(seen)
///     },
///     |_: &Container<i32>| Flow::ready(Vec::new()),
/// );
/// assert_eq!(collect.apply(Container::from(vec![1])).ok(), Some(vec![1]));
/// assert_eq!(collect.apply(Container::from(vec![2])).ok(), Some(vec![2]));
/// ```
pub struct Reducer<T, A, K = String, E = Error> {
    step: Arc<Step<T, A, K, E>>,
    seed: Arc<SeedFactory<T, A, K, E>>,
}

impl<T, A, K, E> Reducer<T, A, K, E>
where
    T: Element,
    K: Element,
    E: Send + 'static,
    A: Send + 'static,
{
    /// Creates a reducer from a step function and a seed factory.
    pub fn new<F, S>(step: F, seed: S) -> Self
    where
        F: Fn(A, T, &Key<K>) -> Flow<A, E> + Send + Sync + 'static,
        S: Fn(&Container<T, K, E>) -> Flow<A, E> + Send + Sync + 'static,
    {
        Self {
            step: Arc::new(step),
            seed: Arc::new(seed),
        }
    }

    /// Folds `container` starting from a freshly produced seed.
    pub fn apply(&self, container: Container<T, K, E>) -> Flow<A, E> {
        let step = Arc::clone(&self.step);
        let seed = (self.seed)(&container);
        reduce(move |accumulator, item, key: &Key<K>| step(accumulator, item, key), seed, container)
    }
}

impl<T, A, K, E> Clone for Reducer<T, A, K, E> {
    fn clone(&self) -> Self {
        Self {
            step: Arc::clone(&self.step),
            seed: Arc::clone(&self.seed),
        }
    }
}

impl<T, A, K, E> fmt::Debug for Reducer<T, A, K, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Reducer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traverse::range;
    use rstest::rstest;
    use std::sync::Mutex;

    fn later<T: Send + 'static>(value: T) -> Flow<T> {
        Flow::pending(async move {
            tokio::task::yield_now().await;
            Ok(value)
        })
    }

    #[rstest]
    fn test_for_each_visits_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let visited = for_each(
            move |value: i32, key: &Key| sink.lock().unwrap().push((key.index(), value)),
            Container::<i32>::from(vec![4, 5]),
        );
        assert!(visited.is_ready());
        assert_eq!(*seen.lock().unwrap(), vec![(Some(0), 4), (Some(1), 5)]);
    }

    #[rstest]
    fn test_reduce_sums_range_synchronously() {
        let sum = reduce(
            |total, value, _| Flow::ready(total + value),
            Flow::ready(0),
            Container::<i64>::from(range(1, 10)),
        );
        assert_eq!(sum.ok(), Some(55));
    }

    #[rstest]
    #[tokio::test]
    async fn test_reduce_sums_range_with_pending_steps() {
        let sum = reduce(
            |total, value, _| later(total + value),
            Flow::ready(0),
            Container::<i64>::from(range(1, 10)),
        );
        assert!(sum.is_pending());
        assert_eq!(sum.await, Ok(55));
    }

    #[rstest]
    #[tokio::test]
    async fn test_reduce_with_pending_seed() {
        let product = reduce(
            |total, value, _| Flow::ready(total * value),
            later(1),
            Container::<i64>::from(range(1, 5)),
        );
        assert_eq!(product.await, Ok(120));
    }

    #[rstest]
    fn test_reduce_stops_at_failure() {
        let result = reduce(
            |total: i64, value, _| {
                if value == 3 {
                    Flow::failed(Error::failed("three"))
                } else {
                    Flow::ready(total + value)
                }
            },
            Flow::ready(0),
            Container::<i64>::from(range(1, 5)),
        );
        assert_eq!(result.err(), Some(Error::failed("three")));
    }

    #[rstest]
    fn test_reduce_with_seeds_from_container() {
        let total = reduce_with(
            |total, value, _| Flow::ready(total + value),
            |container: &Container<i64>| Flow::ready(container.len().map_or(0, |len| len as i64) * 100),
            Container::from(vec![1, 2]),
        );
        assert_eq!(total.ok(), Some(203));
    }

    #[rstest]
    fn test_reducer_does_not_alias_accumulators() {
        let collect = Reducer::new(
            |mut seen: Vec<i32>, value, _: &Key| {
                seen.push(value);
                Flow::ready(seen)
            },
            |_: &Container<i32>| Flow::ready(Vec::new()),
        );
        let first = collect.apply(Container::from(vec![1, 2]));
        let second = collect.clone().apply(Container::from(vec![3]));
        assert_eq!(first.ok(), Some(vec![1, 2]));
        assert_eq!(second.ok(), Some(vec![3]));
    }
}
