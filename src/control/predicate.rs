//! Shareable predicates and their boolean combinators.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::flow::{Flow, all_true, any_true};

type Test<T, E> = dyn Fn(&T) -> Flow<bool, E> + Send + Sync;

/// A test over borrowed values whose outcome may be pending.
///
/// # Examples
///
/// ```rust
/// use flowless::control::Predicate;
/// use flowless::flow::Flow;
///
/// let positive: Predicate<i32> = Predicate::new(|value: &i32| Flow::ready(*value > 0));
/// assert_eq!(positive.test(&3).ok(), Some(true));
/// assert_eq!(positive.negate().test(&3).ok(), Some(false));
/// ```
pub struct Predicate<T, E = Error> {
    test: Arc<Test<T, E>>,
}

impl<T, E> Predicate<T, E> {
    /// Wraps a test function.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T) -> Flow<bool, E> + Send + Sync + 'static,
    {
        Self { test: Arc::new(test) }
    }

    /// Runs the test.
    pub fn test(&self, value: &T) -> Flow<bool, E> {
        (self.test)(value)
    }
}

impl<T: 'static, E: Send + 'static> Predicate<T, E> {
    /// A predicate with a fixed outcome.
    pub fn always(outcome: bool) -> Self {
        Self::new(move |_| Flow::Ready(outcome))
    }

    /// The logical complement.
    #[must_use]
    pub fn negate(self) -> Self {
        let test = self.test;
        Self::new(move |value| not(test(value)))
    }
}

impl<T, E> Clone for Predicate<T, E> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
        }
    }
}

impl<T, E> fmt::Debug for Predicate<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Predicate").finish_non_exhaustive()
    }
}

/// Anything usable as a condition.
pub trait IntoPredicate<T, E> {
    /// Converts `self` into a predicate.
    fn into_predicate(self) -> Predicate<T, E>;
}

impl<T, E> IntoPredicate<T, E> for Predicate<T, E> {
    fn into_predicate(self) -> Self {
        self
    }
}

impl<T, E, F> IntoPredicate<T, E> for F
where
    F: Fn(&T) -> Flow<bool, E> + Send + Sync + 'static,
{
    fn into_predicate(self) -> Predicate<T, E> {
        Predicate::new(self)
    }
}

/// Negates a possibly pending condition.
pub fn not<E: Send + 'static>(condition: Flow<bool, E>) -> Flow<bool, E> {
    condition.map(|holds| !holds)
}

/// Holds when every predicate holds.
///
/// Predicates are tested in order until one is synchronously false; pending
/// outcomes are awaited together and the first false one decides.
pub fn and<T, E, I>(predicates: I) -> Predicate<T, E>
where
    T: 'static,
    E: Send + 'static,
    I: IntoIterator,
    I::Item: IntoPredicate<T, E>,
{
    let predicates: Arc<[Predicate<T, E>]> = predicates
        .into_iter()
        .map(IntoPredicate::into_predicate)
        .collect();
    Predicate::new(move |value| all_true(predicates.iter().map(|predicate| predicate.test(value))))
}

/// Holds when any predicate holds.
///
/// Predicates are tested in order until one is synchronously true; pending
/// outcomes are awaited together and the first true one decides.
pub fn or<T, E, I>(predicates: I) -> Predicate<T, E>
where
    T: 'static,
    E: Send + 'static,
    I: IntoIterator,
    I::Item: IntoPredicate<T, E>,
{
    let predicates: Arc<[Predicate<T, E>]> = predicates
        .into_iter()
        .map(IntoPredicate::into_predicate)
        .collect();
    Predicate::new(move |value| any_true(predicates.iter().map(|predicate| predicate.test(value))))
}

/// Holds for values equal to `expected`.
pub fn eq<T, E>(expected: T) -> Predicate<T, E>
where
    T: PartialEq + Send + Sync + 'static,
{
    Predicate::new(move |value| Flow::Ready(*value == expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn later(outcome: bool) -> Flow<bool> {
        Flow::pending(async move {
            tokio::task::yield_now().await;
            Ok(outcome)
        })
    }

    fn positive() -> Predicate<i32> {
        Predicate::new(|value: &i32| Flow::ready(*value > 0))
    }

    fn even() -> Predicate<i32> {
        Predicate::new(|value: &i32| Flow::ready(value % 2 == 0))
    }

    #[rstest]
    #[case(4, true, true)]
    #[case(3, false, true)]
    #[case(-3, false, false)]
    fn test_and_or(#[case] value: i32, #[case] both: bool, #[case] either: bool) {
        assert_eq!(and([positive(), even()]).test(&value).ok(), Some(both));
        assert_eq!(or([positive(), even()]).test(&value).ok(), Some(either));
    }

    #[rstest]
    fn test_empty_combinators() {
        assert_eq!(and(Vec::<Predicate<i32>>::new()).test(&1).ok(), Some(true));
        assert_eq!(or(Vec::<Predicate<i32>>::new()).test(&1).ok(), Some(false));
    }

    #[rstest]
    fn test_eq_and_always() {
        assert_eq!(eq::<_, Error>("a").test(&"a").ok(), Some(true));
        assert_eq!(Predicate::<i32>::always(false).test(&1).ok(), Some(false));
    }

    #[rstest]
    #[tokio::test]
    async fn test_pending_outcomes_are_combined() {
        let slow_true = Predicate::new(|_: &i32| later(true));
        let slow_false = Predicate::new(|_: &i32| later(false));
        assert_eq!(and([slow_true.clone(), slow_false.clone()]).test(&0).await, Ok(false));
        assert_eq!(or([slow_false, slow_true]).test(&0).await, Ok(true));
    }

    #[rstest]
    #[tokio::test]
    async fn test_not_of_pending() {
        assert_eq!(not(later(true)).await, Ok(false));
    }
}
