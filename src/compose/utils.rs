//! Small adapters between plain functions and flow-returning stages.
//!
//! - [`identity`]: returns its argument unchanged
//! - [`lift`]: turns `Fn(T) -> U` into a stage that is always ready
//! - [`fallible`]: turns `Fn(T) -> Result<U, E>` into a stage that fails
//!   synchronously on `Err`
//! - [`constant`]: a stage that ignores its input
//! - [`__`]: the argument placeholder for curried functions

use crate::flow::Flow;

/// Returns the value unchanged.
///
/// # Examples
///
/// ```
/// use flowless::compose::identity;
///
/// assert_eq!(identity(42), 42);
/// ```
#[inline]
pub fn identity<T>(value: T) -> T {
    value
}

/// Wraps a plain function so that its result is a ready [`Flow`].
///
/// # Examples
///
/// ```
/// use flowless::compose::lift;
/// use flowless::flow::Flow;
///
/// let double = lift(|value: i32| value * 2);
/// let doubled: Flow<i32> = double(21);
/// assert_eq!(doubled.ok(), Some(42));
/// ```
#[inline]
pub fn lift<T, U, E, F>(function: F) -> impl Fn(T) -> Flow<U, E> + Send + Sync + 'static
where
    T: 'static,
    U: 'static,
    E: 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    move |value| Flow::Ready(function(value))
}

/// Wraps a function returning `Result`: `Ok` becomes ready, `Err` a
/// synchronous failure.
///
/// # Examples
///
/// ```
/// use flowless::compose::fallible;
/// use flowless::error::Error;
///
/// let parse = fallible(|text: &'static str| text.parse::<i32>().map_err(|error| Error::failed(error.to_string())));
/// assert_eq!(parse("12").ok(), Some(12));
/// assert!(parse("twelve").is_failed());
/// ```
#[inline]
pub fn fallible<T, U, E, F>(function: F) -> impl Fn(T) -> Flow<U, E> + Send + Sync + 'static
where
    T: 'static,
    U: 'static,
    E: 'static,
    F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
{
    move |value| Flow::from(function(value))
}

/// Creates a stage function that always yields `value`, ignoring its input.
///
/// Handy as an error handler that recovers with a default.
///
/// # Examples
///
/// ```
/// use flowless::compose::constant;
/// use flowless::flow::Flow;
///
/// let always_zero = constant::<i32, &str, flowless::error::Error>(0);
/// assert_eq!(always_zero("ignored").ok(), Some(0));
/// ```
#[inline]
pub fn constant<T, U, E>(value: T) -> impl Fn(U) -> Flow<T, E> + Send + Sync + 'static
where
    T: Clone + Send + Sync + 'static,
    U: 'static,
    E: 'static,
{
    move |_| Flow::Ready(value.clone())
}

/// Placeholder marker type for curried application.
///
/// A placeholder leaves its position open; a later call fills it. Converts
/// into [`Slot::Hole`](super::Slot::Hole).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placeholder;

/// The placeholder constant for curried application.
///
/// Named `__` because a single underscore is not a valid expression.
///
/// # Examples
///
/// ```
/// use flowless::compose::{__, Slot, curry_n};
/// use flowless::flow::Flow;
///
/// let subtract = curry_n(2, |arguments: Vec<i32>| Flow::<i32>::ready(arguments[0] - arguments[1])).unwrap();
/// let minus_three = subtract.call([__.into(), Slot::value(3)]).partial().unwrap();
/// assert_eq!(minus_three.call([Slot::value(10)]).complete().unwrap().ok(), Some(7));
/// ```
#[allow(non_upper_case_globals)]
pub const __: Placeholder = Placeholder;
