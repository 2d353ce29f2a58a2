//! Values that are either available now or later.
//!
//! [`Flow`] is the single seam where the "transparent async" behaviour of
//! this crate lives. Every engine inspects the flows it receives: settled
//! flows are handled immediately, in-process, and the first pending flow
//! switches the engine onto a continuation that finishes the work once the
//! value resolves.
//!
//! # Variants
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `Ready(value)` | available synchronously |
//! | `Failed(error)` | failed synchronously (the "thrown" error) |
//! | `Pending(deferred)` | a boxed future resolving to `Ok` or rejecting with `Err` |
//!
//! Settled variants are evaluated eagerly, mirroring how pure values are
//! treated elsewhere in functional libraries: `Flow::ready(2).map(f)` calls
//! `f` immediately and allocates nothing. Pending flows are chained lazily;
//! nothing runs until the flow is awaited.
//!
//! # Examples
//!
//! ```rust
//! use flowless::flow::Flow;
//!
//! let doubled: Flow<i32> = Flow::ready(21).map(|value| value * 2);
//! assert_eq!(doubled.ok(), Some(42));
//! ```
//!
//! ```rust,ignore
//! use flowless::flow::Flow;
//!
//! let later: Flow<i32> = Flow::pending(async { Ok(21) });
//! assert!(later.is_pending());
//! assert_eq!(later.map(|value| value * 2).await, Ok(42));
//! ```

mod gather;

pub use gather::{Gather, all_true, any_true, await_all};

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::{self, BoxFuture, Either, Ready, TryFutureExt};

use crate::error::Error;

/// A boxed future standing for a value that is not available yet.
pub type Deferred<T, E = Error> = BoxFuture<'static, Result<T, E>>;

/// A value that is ready, failed, or pending.
///
/// `Flow` implements [`IntoFuture`], so any flow can be awaited and yields a
/// `Result<T, E>` regardless of its variant.
pub enum Flow<T, E = Error> {
    /// The value is available now.
    Ready(T),
    /// The computation failed synchronously.
    Failed(E),
    /// The value will be available once the future resolves.
    Pending(Deferred<T, E>),
}

static_assertions::assert_impl_all!(Flow<i32>: Send);
static_assertions::assert_impl_all!(Deferred<String>: Send);

impl<T, E> Flow<T, E> {
    /// Wraps an available value.
    pub const fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    /// Wraps a synchronous failure.
    pub const fn failed(error: E) -> Self {
        Self::Failed(error)
    }

    /// Returns `true` if the value is still outstanding.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Returns `true` if the value is available now.
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns `true` if the computation failed synchronously.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the value if it is available now.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Failed(_) | Self::Pending(_) => None,
        }
    }

    /// Returns the error if the computation failed synchronously.
    pub fn err(self) -> Option<E> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Ready(_) | Self::Pending(_) => None,
        }
    }
}

impl<T: Send + 'static, E: Send + 'static> Flow<T, E> {
    /// Wraps a future as a pending value.
    ///
    /// The future is not polled until the flow is awaited.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }

    /// Transforms the value once it is available.
    pub fn map<U, F>(self, function: F) -> Flow<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match self {
            Self::Ready(value) => Flow::Ready(function(value)),
            Self::Failed(error) => Flow::Failed(error),
            Self::Pending(deferred) => Flow::Pending(Box::pin(deferred.map_ok(function))),
        }
    }

    /// Transforms the error of a failed or rejected flow.
    pub fn map_err<E2, F>(self, function: F) -> Flow<T, E2>
    where
        E2: Send + 'static,
        F: FnOnce(E) -> E2 + Send + 'static,
    {
        match self {
            Self::Ready(value) => Flow::Ready(value),
            Self::Failed(error) => Flow::Failed(function(error)),
            Self::Pending(deferred) => Flow::Pending(Box::pin(deferred.map_err(function))),
        }
    }

    /// Chains a step that runs on success.
    ///
    /// On a ready flow `function` runs immediately; on a pending flow it runs
    /// after the value resolves. Failures pass through untouched.
    pub fn and_then<U, F>(self, function: F) -> Flow<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Flow<U, E> + Send + 'static,
    {
        match self {
            Self::Ready(value) => function(value),
            Self::Failed(error) => Flow::Failed(error),
            Self::Pending(deferred) => Flow::pending(async move {
                let value = deferred.await?;
                function(value).await
            }),
        }
    }

    /// Chains a step that runs on failure.
    ///
    /// The counterpart of [`Flow::and_then`]: `function` sees synchronous
    /// failures immediately and rejections once they happen. Values pass
    /// through untouched.
    pub fn or_else<F>(self, function: F) -> Self
    where
        F: FnOnce(E) -> Self + Send + 'static,
    {
        match self {
            Self::Ready(value) => Self::Ready(value),
            Self::Failed(error) => function(error),
            Self::Pending(deferred) => Self::pending(async move {
                match deferred.await {
                    Ok(value) => Ok(value),
                    Err(error) => function(error).await,
                }
            }),
        }
    }

    /// Converts the flow into a boxed future, whatever its variant.
    pub fn into_deferred(self) -> Deferred<T, E> {
        match self {
            Self::Ready(value) => Box::pin(future::ready(Ok(value))),
            Self::Failed(error) => Box::pin(future::ready(Err(error))),
            Self::Pending(deferred) => deferred,
        }
    }
}

impl<T, E> From<Result<T, E>> for Flow<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(error),
        }
    }
}

impl<T, E> IntoFuture for Flow<T, E> {
    type Output = Result<T, E>;
    type IntoFuture = Either<Ready<Result<T, E>>, Deferred<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Self::Ready(value) => Either::Left(future::ready(Ok(value))),
            Self::Failed(error) => Either::Left(future::ready(Err(error))),
            Self::Pending(deferred) => Either::Right(deferred),
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Flow<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => formatter.debug_tuple("Ready").field(value).finish(),
            Self::Failed(error) => formatter.debug_tuple("Failed").field(error).finish(),
            Self::Pending(_) => formatter.write_str("Pending(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_ready_map_runs_immediately() {
        let flow: Flow<i32> = Flow::ready(20).map(|value| value + 1);
        assert!(flow.is_ready());
        assert_eq!(flow.ok(), Some(21));
    }

    #[rstest]
    fn test_failed_skips_and_then() {
        let flow: Flow<i32> = Flow::failed(Error::failed("boom"));
        let chained = flow.and_then(|value| Flow::ready(value * 2));
        assert_eq!(chained.err(), Some(Error::failed("boom")));
    }

    #[rstest]
    fn test_or_else_recovers_synchronously() {
        let flow: Flow<i32> = Flow::failed(Error::failed("boom"));
        let recovered = flow.or_else(|_| Flow::ready(0));
        assert_eq!(recovered.ok(), Some(0));
    }

    #[rstest]
    fn test_from_result() {
        assert!(Flow::<i32>::from(Ok(1)).is_ready());
        assert!(Flow::<i32>::from(Err(Error::StreamClosed)).is_failed());
    }

    #[rstest]
    fn test_debug_hides_pending_future() {
        let flow: Flow<i32> = Flow::pending(async { Ok(1) });
        assert_eq!(format!("{flow:?}"), "Pending(..)");
        assert_eq!(format!("{:?}", Flow::<i32>::ready(3)), "Ready(3)");
    }

    #[rstest]
    #[tokio::test]
    async fn test_pending_and_then_stays_pending() {
        let flow: Flow<i32> = Flow::pending(async { Ok(20) });
        let chained = flow.and_then(|value| Flow::ready(value + 1));
        assert!(chained.is_pending());
        assert_eq!(chained.await, Ok(21));
    }

    #[rstest]
    #[tokio::test]
    async fn test_pending_or_else_sees_rejection() {
        let flow: Flow<i32> = Flow::pending(async { Err(Error::failed("late")) });
        let recovered = flow.or_else(|error| match error {
            Error::Failed(message) => Flow::ready(i32::try_from(message.len()).unwrap_or(0)),
            other => Flow::failed(other),
        });
        assert_eq!(recovered.await, Ok(4));
    }

    #[rstest]
    #[tokio::test]
    async fn test_into_deferred_of_settled_values() {
        assert_eq!(Flow::<i32>::ready(5).into_deferred().await, Ok(5));
        assert_eq!(
            Flow::<i32>::failed(Error::StreamClosed).into_deferred().await,
            Err(Error::StreamClosed)
        );
    }
}
