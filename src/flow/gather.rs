//! Fan-in over several flows.
//!
//! [`await_all`] and [`Gather`] turn many flows into one: settled inputs give
//! a settled output without allocating a future, and a single pending input
//! makes the whole result pending. [`any_true`] and [`all_true`] are the
//! short-circuiting boolean counterparts used by predicate combinators and
//! by `some`/`every`.

use std::future::IntoFuture;

use futures::FutureExt;
use futures::future::try_join_all;
use futures::stream::{FuturesUnordered, StreamExt};

use super::{Deferred, Flow};

/// Waits for every flow, preserving positional order.
///
/// - No flow pending and none failed: `Ready` with all values.
/// - Any flow failed synchronously: `Failed` with the first failure in
///   positional order.
/// - Otherwise: `Pending`, resolving once every flow resolved and rejecting
///   with the first rejection observed.
///
/// # Examples
///
/// ```rust
/// use flowless::flow::{Flow, await_all};
///
/// let gathered: Flow<Vec<i32>> = await_all(vec![Flow::ready(1), Flow::ready(2)]);
/// assert_eq!(gathered.ok(), Some(vec![1, 2]));
/// ```
pub fn await_all<T, E>(flows: Vec<Flow<T, E>>) -> Flow<Vec<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let mut flows = flows;
    if let Some(position) = flows.iter().position(Flow::is_failed) {
        if let Flow::Failed(error) = flows.swap_remove(position) {
            return Flow::Failed(error);
        }
    }
    let settled = flows.iter().all(Flow::is_ready);
    let joined: Deferred<Vec<T>, E> =
        Box::pin(try_join_all(flows.into_iter().map(IntoFuture::into_future)));
    settle(joined, settled)
}

/// Resolves `joined` in place when every input was ready.
///
/// A join over ready futures completes on its first poll.
fn settle<T, E>(mut joined: Deferred<T, E>, settled: bool) -> Flow<T, E> {
    if settled {
        if let Some(result) = (&mut joined).now_or_never() {
            return Flow::from(result);
        }
    }
    Flow::Pending(joined)
}

/// An argument list whose members may be pending.
///
/// Implemented for a single [`Flow`], for `Vec<Flow<T, E>>` and for tuples
/// of two to six flows sharing one error type.
pub trait Gather<E> {
    /// The argument list once every member resolved.
    type Output;

    /// Fans the members in: settled when all members are settled, pending
    /// otherwise.
    fn gather(self) -> Flow<Self::Output, E>;
}

impl<T, E> Gather<E> for Flow<T, E> {
    type Output = T;

    fn gather(self) -> Self {
        self
    }
}

impl<T, E> Gather<E> for Vec<Flow<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = Vec<T>;

    fn gather(self) -> Flow<Vec<T>, E> {
        await_all(self)
    }
}

macro_rules! impl_gather_for_tuple {
    ($($type_parameter:ident $binding:ident),+) => {
        impl<E, $($type_parameter),+> Gather<E> for ($(Flow<$type_parameter, E>,)+)
        where
            E: Send + 'static,
            $($type_parameter: Send + 'static,)+
        {
            type Output = ($($type_parameter,)+);

            fn gather(self) -> Flow<Self::Output, E> {
                let ($($binding,)+) = self;
                $(
                    let $binding = match $binding {
                        Flow::Failed(error) => return Flow::Failed(error),
                        unsettled => unsettled,
                    };
                )+
                let settled = $($binding.is_ready())&&+;
                let joined: Deferred<Self::Output, E> = Box::pin(async move {
                    futures::try_join!($($binding.into_future()),+)
                });
                settle(joined, settled)
            }
        }
    };
}

impl_gather_for_tuple!(A first, B second);
impl_gather_for_tuple!(A first, B second, C third);
impl_gather_for_tuple!(A first, B second, C third, D fourth);
impl_gather_for_tuple!(A first, B second, C third, D fourth, F fifth);
impl_gather_for_tuple!(A first, B second, C third, D fourth, F fifth, G sixth);

/// Short-circuiting disjunction over lazily produced boolean flows.
///
/// Flows are pulled from `flows` one at a time. The first synchronous `true`
/// stops the iteration; a synchronous failure is returned immediately.
/// Pending results are collected and raced once the iteration is exhausted:
/// the first one resolving to `true` wins, a rejection fails the whole
/// result, and `false` is produced only once all of them resolved to
/// `false`.
pub fn any_true<E, I>(flows: I) -> Flow<bool, E>
where
    E: Send + 'static,
    I: IntoIterator<Item = Flow<bool, E>>,
{
    let mut outstanding = FuturesUnordered::new();
    for flow in flows {
        match flow {
            Flow::Ready(true) => return Flow::Ready(true),
            Flow::Ready(false) => {}
            Flow::Failed(error) => return Flow::Failed(error),
            Flow::Pending(deferred) => outstanding.push(deferred),
        }
    }
    if outstanding.is_empty() {
        return Flow::Ready(false);
    }
    tracing::trace!(outstanding = outstanding.len(), "racing pending conditions");
    Flow::pending(async move {
        while let Some(condition) = outstanding.next().await {
            if condition? {
                return Ok(true);
            }
        }
        Ok(false)
    })
}

/// Short-circuiting conjunction, defined as the negation of [`any_true`]
/// over negated flows.
pub fn all_true<E, I>(flows: I) -> Flow<bool, E>
where
    E: Send + 'static,
    I: IntoIterator<Item = Flow<bool, E>>,
{
    any_true(flows.into_iter().map(|flow| flow.map(|condition| !condition)))
        .map(|found_false| !found_false)
}
