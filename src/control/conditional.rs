//! Multi-branch conditionals with possibly pending predicates.

use std::fmt;
use std::sync::Arc;

use super::predicate::{IntoPredicate, Predicate};
use crate::error::Error;
use crate::flow::Flow;

type Branch<T, U, E> = dyn Fn(T) -> Flow<U, E> + Send + Sync;

struct Arm<T, U, E> {
    predicate: Predicate<T, E>,
    then: Arc<Branch<T, U, E>>,
}

impl<T, U, E> Clone for Arm<T, U, E> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            then: Arc::clone(&self.then),
        }
    }
}

/// An `if` / `else if` / `else` chain.
///
/// Predicates are tried in declaration order and the branch of the first
/// one that holds runs; no later predicate is tested. When a predicate is
/// pending, the remaining predicates are tested in order once it resolved,
/// so the short-circuit holds across synchronous and pending predicates.
/// Without a match and without an `otherwise` branch the result is `None`.
///
/// # Examples
///
/// ```rust
/// use flowless::control::if_else;
/// use flowless::flow::Flow;
///
/// let sign = if_else(|value: &i32| Flow::ready(*value > 0), |_| Flow::ready("positive"))
///     .else_if(|value: &i32| Flow::ready(*value < 0), |_| Flow::ready("negative"))
///     .otherwise(|_| Flow::<&str>::ready("zero"));
///
/// assert_eq!(sign.call(5).ok(), Some(Some("positive")));
/// assert_eq!(sign.call(0).ok(), Some(Some("zero")));
/// ```
pub struct Conditional<T, U, E = Error> {
    arms: Vec<Arm<T, U, E>>,
    otherwise: Option<Arc<Branch<T, U, E>>>,
}

/// Starts a conditional with its first branch.
pub fn if_else<T, U, E, P, F>(predicate: P, then: F) -> Conditional<T, U, E>
where
    P: IntoPredicate<T, E>,
    F: Fn(T) -> Flow<U, E> + Send + Sync + 'static,
{
    Conditional {
        arms: vec![Arm {
            predicate: predicate.into_predicate(),
            then: Arc::new(then),
        }],
        otherwise: None,
    }
}

impl<T, U, E> Conditional<T, U, E> {
    /// Appends a branch tried after the existing ones.
    #[must_use]
    pub fn else_if<P, F>(mut self, predicate: P, then: F) -> Self
    where
        P: IntoPredicate<T, E>,
        F: Fn(T) -> Flow<U, E> + Send + Sync + 'static,
    {
        self.arms.push(Arm {
            predicate: predicate.into_predicate(),
            then: Arc::new(then),
        });
        self
    }

    /// Sets the branch that runs when no predicate holds.
    #[must_use]
    pub fn otherwise<F>(mut self, branch: F) -> Self
    where
        F: Fn(T) -> Flow<U, E> + Send + Sync + 'static,
    {
        self.otherwise = Some(Arc::new(branch));
        self
    }

    /// Number of predicate branches.
    pub fn len(&self) -> usize {
        self.arms.len()
    }

    /// Returns `true` if there are no predicate branches.
    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }
}

impl<T, U, E> Conditional<T, U, E>
where
    T: Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
{
    /// Evaluates the chain against `value`.
    pub fn call(&self, value: T) -> Flow<Option<U>, E> {
        for (index, arm) in self.arms.iter().enumerate() {
            match arm.predicate.test(&value) {
                Flow::Ready(true) => return (arm.then)(value).map(Some),
                Flow::Ready(false) => {}
                Flow::Failed(error) => return Flow::Failed(error),
                Flow::Pending(condition) => {
                    tracing::trace!(branch = index, "predicate pending, deferring the remaining branches");
                    let then = Arc::clone(&arm.then);
                    let rest = self.arms[index + 1..].to_vec();
                    let otherwise = self.otherwise.clone();
                    return Flow::pending(async move {
                        if condition.await? {
                            return then(value).await.map(Some);
                        }
                        for arm in rest {
                            let condition = arm.predicate.test(&value);
                            if condition.await? {
                                return (arm.then)(value).await.map(Some);
                            }
                        }
                        match otherwise {
                            Some(branch) => branch(value).await.map(Some),
                            None => Ok(None),
                        }
                    });
                }
            }
        }
        match &self.otherwise {
            Some(branch) => branch(value).map(Some),
            None => Flow::Ready(None),
        }
    }
}

impl<T, U, E> Clone for Conditional<T, U, E> {
    fn clone(&self) -> Self {
        Self {
            arms: self.arms.clone(),
            otherwise: self.otherwise.clone(),
        }
    }
}

impl<T, U, E> fmt::Debug for Conditional<T, U, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Conditional")
            .field("branches", &self.arms.len())
            .field("otherwise", &self.otherwise.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn later(outcome: bool) -> Flow<bool> {
        Flow::pending(async move {
            tokio::task::yield_now().await;
            Ok(outcome)
        })
    }

    fn classify() -> Conditional<i32, &'static str> {
        if_else(|value: &i32| Flow::ready(*value > 0), |_| Flow::ready("positive"))
            .else_if(|value: &i32| Flow::ready(*value < 0), |_| Flow::ready("negative"))
    }

    #[rstest]
    #[case(3, Some("positive"))]
    #[case(-3, Some("negative"))]
    #[case(0, None)]
    fn test_first_matching_branch_runs(#[case] value: i32, #[case] expected: Option<&'static str>) {
        assert_eq!(classify().call(value).ok(), Some(expected));
    }

    #[rstest]
    fn test_otherwise_runs_without_match() {
        let conditional = classify().otherwise(|_| Flow::ready("zero"));
        assert_eq!(conditional.call(0).ok(), Some(Some("zero")));
    }

    #[rstest]
    fn test_failing_predicate_propagates() {
        let conditional: Conditional<i32, i32> =
            if_else(|_: &i32| Flow::failed(Error::failed("predicate")), Flow::ready);
        assert_eq!(conditional.call(1).err(), Some(Error::failed("predicate")));
    }

    #[rstest]
    #[tokio::test]
    async fn test_no_predicate_runs_after_the_first_truthy_one() {
        let tested = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&tested);
        let conditional = if_else(|_: &i32| later(false), |_| Flow::ready(1))
            .else_if(|_: &i32| later(true), |_| Flow::ready(2))
            .else_if(
                move |_: &i32| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Flow::ready(true)
                },
                |_| Flow::ready(3),
            );
        let result = conditional.call(0);
        assert!(result.is_pending());
        assert_eq!(result.await, Ok(Some(2)));
        assert_eq!(tested.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_pending_chain_falls_back_to_otherwise() {
        let conditional = if_else(|_: &i32| later(false), |_| Flow::ready(1))
            .otherwise(|value| Flow::ready(value * 100));
        assert_eq!(conditional.call(7).await, Ok(Some(700)));
    }
}
