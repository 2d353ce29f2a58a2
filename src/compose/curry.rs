//! Curried functions with placeholders and pending arguments.

use std::fmt;
use std::sync::Arc;

use futures::future::{FutureExt, Shared};
use smallvec::SmallVec;

use super::utils::Placeholder;
use crate::error::Error;
use crate::flow::{Deferred, Flow, await_all};

/// The largest arity [`curry_n`] accepts.
pub const MAX_ARITY: usize = 10;

/// One argument position of a curried call.
pub enum Slot<A, E = Error> {
    /// A supplied argument, possibly pending.
    Filled(Flow<A, E>),
    /// A position left open for a later call.
    Hole,
}

impl<A, E> Slot<A, E> {
    /// A settled argument.
    pub const fn value(value: A) -> Self {
        Self::Filled(Flow::Ready(value))
    }

    /// Returns `true` for an open position.
    pub const fn is_hole(&self) -> bool {
        matches!(self, Self::Hole)
    }
}

impl<A, E> From<Placeholder> for Slot<A, E> {
    fn from(_: Placeholder) -> Self {
        Self::Hole
    }
}

impl<A, E> From<Flow<A, E>> for Slot<A, E> {
    fn from(flow: Flow<A, E>) -> Self {
        Self::Filled(flow)
    }
}

impl<A: fmt::Debug, E: fmt::Debug> fmt::Debug for Slot<A, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filled(flow) => formatter.debug_tuple("Filled").field(flow).finish(),
            Self::Hole => formatter.write_str("Hole"),
        }
    }
}

type Target<A, T, E> = dyn Fn(Vec<A>) -> Flow<T, E> + Send + Sync;

/// A supplied argument as a curried function keeps it.
///
/// Pending arguments are shared so that every later call observes the same
/// resolution.
enum Held<A, E> {
    Ready(A),
    Failed(E),
    Waiting(Shared<Deferred<A, E>>),
    Hole,
}

impl<A, E> Held<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn from_slot(slot: Slot<A, E>) -> Self {
        match slot {
            Slot::Filled(Flow::Ready(value)) => Self::Ready(value),
            Slot::Filled(Flow::Failed(error)) => Self::Failed(error),
            Slot::Filled(Flow::Pending(deferred)) => Self::Waiting(deferred.shared()),
            Slot::Hole => Self::Hole,
        }
    }

    fn to_flow(&self) -> Option<Flow<A, E>> {
        match self {
            Self::Ready(value) => Some(Flow::Ready(value.clone())),
            Self::Failed(error) => Some(Flow::Failed(error.clone())),
            Self::Waiting(shared) => Some(Flow::pending(shared.clone())),
            Self::Hole => None,
        }
    }

    const fn is_hole(&self) -> bool {
        matches!(self, Self::Hole)
    }
}

impl<A: Clone, E: Clone> Clone for Held<A, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Ready(value) => Self::Ready(value.clone()),
            Self::Failed(error) => Self::Failed(error.clone()),
            Self::Waiting(shared) => Self::Waiting(shared.clone()),
            Self::Hole => Self::Hole,
        }
    }
}

/// A function collecting its arguments over one or more calls.
///
/// Created by [`curry_n`]. Calls never change the function they are made
/// on: each [`Curried::call`] returns either a new partial application or
/// the completed call, so a partial application can be reused with
/// different remaining arguments. Arguments are cloned into every call made
/// from it; a pending argument is awaited once and its outcome shared.
pub struct Curried<A, T, E = Error> {
    arity: usize,
    target: Arc<Target<A, T, E>>,
    slots: SmallVec<[Held<A, E>; 4]>,
}

/// The outcome of a curried call.
pub enum Applied<A, T, E = Error> {
    /// Not every position is filled yet.
    Partial(Curried<A, T, E>),
    /// The target ran (or will run once the arguments resolve).
    Complete(Flow<T, E>),
}

impl<A, T, E> Applied<A, T, E> {
    /// Returns `true` if the target was invoked.
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Returns the partial application, if any.
    pub fn partial(self) -> Option<Curried<A, T, E>> {
        match self {
            Self::Partial(curried) => Some(curried),
            Self::Complete(_) => None,
        }
    }

    /// Returns the result of the completed call, if any.
    pub fn complete(self) -> Option<Flow<T, E>> {
        match self {
            Self::Complete(result) => Some(result),
            Self::Partial(_) => None,
        }
    }
}

/// Curries `target` over `arity` arguments.
///
/// Arguments accumulate across calls. Holes ([`__`](super::__)) leave a
/// position open; later arguments fill the open positions from the left and
/// the rest are appended. Once the first `arity` positions are filled the
/// target runs with every supplied argument, in position order. If any of
/// them is pending, the target runs after all of them resolved.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `arity` exceeds [`MAX_ARITY`].
///
/// # Examples
///
/// ```rust
/// use flowless::compose::{Slot, curry_n};
/// use flowless::flow::Flow;
///
/// let add_mul = curry_n(3, |arguments: Vec<i32>| {
///     Flow::<i32>::ready((arguments[0] + arguments[1]) * arguments[2])
/// })
/// .unwrap();
/// let add_two = add_mul.call([Slot::value(2)]).partial().unwrap();
/// let add_two_three = add_two.call([Slot::value(3)]).partial().unwrap();
/// assert_eq!(add_two_three.call([Slot::value(5)]).complete().unwrap().ok(), Some(25));
/// assert_eq!(add_two_three.call([Slot::value(10)]).complete().unwrap().ok(), Some(50));
/// ```
pub fn curry_n<A, T, E, F>(arity: usize, target: F) -> Result<Curried<A, T, E>, Error>
where
    F: Fn(Vec<A>) -> Flow<T, E> + Send + Sync + 'static,
{
    if arity > MAX_ARITY {
        return Err(Error::invalid_argument(
            "arity",
            format!("must be at most {MAX_ARITY}, got {arity}"),
        ));
    }
    Ok(Curried {
        arity,
        target: Arc::new(target),
        slots: SmallVec::new(),
    })
}

impl<A, T, E> Curried<A, T, E>
where
    A: Clone + Send + Sync + 'static,
    T: Send + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Number of arguments the target needs.
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Number of the first `arity` positions still open.
    pub fn remaining(&self) -> usize {
        let filled = self
            .slots
            .iter()
            .take(self.arity)
            .filter(|slot| !slot.is_hole())
            .count();
        self.arity - filled
    }

    /// Supplies more arguments.
    pub fn call<I>(&self, arguments: I) -> Applied<A, T, E>
    where
        I: IntoIterator<Item = Slot<A, E>>,
    {
        let mut slots = self.slots.clone();
        let mut arguments = arguments.into_iter().map(Held::from_slot);
        for slot in slots.iter_mut().filter(|slot| slot.is_hole()) {
            match arguments.next() {
                Some(argument) => *slot = argument,
                None => break,
            }
        }
        slots.extend(arguments);

        let arity = self.arity;
        let saturated = slots.len() >= arity && slots[..arity].iter().all(|slot| !slot.is_hole());
        if !saturated {
            return Applied::Partial(Self {
                arity,
                target: Arc::clone(&self.target),
                slots,
            });
        }

        let supplied: Vec<Flow<A, E>> = slots.iter().filter_map(Held::to_flow).collect();
        let gathered = await_all(supplied);
        if gathered.is_pending() {
            tracing::trace!(arity, "curried arguments pending, deferring the call");
        }
        let target = Arc::clone(&self.target);
        Applied::Complete(gathered.and_then(move |arguments| target(arguments)))
    }

    /// Supplies settled arguments.
    pub fn apply<I>(&self, arguments: I) -> Applied<A, T, E>
    where
        I: IntoIterator<Item = A>,
    {
        self.call(arguments.into_iter().map(Slot::value))
    }
}

impl<A: Clone, T, E: Clone> Clone for Curried<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            arity: self.arity,
            target: Arc::clone(&self.target),
            slots: self.slots.clone(),
        }
    }
}

impl<A, T, E> fmt::Debug for Curried<A, T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Curried")
            .field("arity", &self.arity)
            .field("supplied", &self.slots.len())
            .finish_non_exhaustive()
    }
}
