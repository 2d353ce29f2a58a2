//! Integration tests for conditionals and predicate combinators.

use flowless::control::{Conditional, Predicate, and, eq, if_else, not, or};
use flowless::error::Error;
use flowless::flow::Flow;
use rstest::rstest;
use std::sync::{Arc, Mutex};

fn deferred<T: Send + 'static>(value: T) -> Flow<T> {
    Flow::pending(async move {
        tokio::task::yield_now().await;
        Ok(value)
    })
}

fn recording(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str, outcome: Flow<bool>) -> Predicate<i32> {
    let log = Arc::clone(log);
    let outcome = Mutex::new(Some(outcome));
    Predicate::new(move |_: &i32| {
        log.lock().unwrap().push(name);
        outcome.lock().unwrap().take().unwrap_or(Flow::Ready(false))
    })
}

fn fizz_buzz() -> Conditional<i32, String> {
    if_else(|value: &i32| Flow::ready(value % 15 == 0), |_| Flow::ready("FizzBuzz".to_string()))
        .else_if(|value: &i32| deferred(value % 3 == 0), |_| Flow::ready("Fizz".to_string()))
        .else_if(|value: &i32| Flow::ready(value % 5 == 0), |_| deferred("Buzz".to_string()))
        .otherwise(|value| Flow::ready(value.to_string()))
}

// =============================================================================
// Branch selection
// =============================================================================

#[rstest]
#[case(15, "FizzBuzz")]
#[case(9, "Fizz")]
#[case(10, "Buzz")]
#[case(7, "7")]
#[tokio::test]
async fn test_mixed_predicates_pick_the_first_match(#[case] value: i32, #[case] expected: &str) {
    assert_eq!(fizz_buzz().call(value).await, Ok(Some(expected.to_string())));
}

#[rstest]
fn test_settled_chain_stays_synchronous() {
    let result = fizz_buzz().call(30);
    assert!(result.is_ready());
    assert_eq!(result.ok(), Some(Some("FizzBuzz".to_string())));
}

#[rstest]
fn test_no_match_without_otherwise_is_none() {
    let conditional: Conditional<i32, i32> = if_else(eq(1), Flow::ready);
    assert_eq!(conditional.call(2).ok(), Some(None));
}

#[rstest]
#[tokio::test]
async fn test_predicates_run_in_order_and_stop_at_the_first_match() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let conditional = if_else(recording(&log, "first", deferred(false)), |_| Flow::ready(1))
        .else_if(recording(&log, "second", Flow::Ready(false)), |_| Flow::ready(2))
        .else_if(recording(&log, "third", deferred(true)), |_| Flow::ready(3))
        .else_if(recording(&log, "fourth", Flow::Ready(true)), |_| Flow::ready(4));

    assert_eq!(conditional.call(0).await, Ok(Some(3)));
    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
}

#[rstest]
#[tokio::test]
async fn test_rejected_predicate_rejects_the_call() {
    let conditional = if_else(
        |_: &i32| Flow::pending(async { Err(Error::failed("lookup")) }),
        |_| Flow::ready(1),
    )
    .otherwise(|_| Flow::ready(0));
    assert_eq!(conditional.call(0).await, Err(Error::failed("lookup")));
}

#[rstest]
#[tokio::test]
async fn test_branch_results_may_be_pending() {
    let conditional = if_else(|value: &i32| Flow::ready(*value > 0), |value| deferred(value * 2));
    let result = conditional.call(4);
    assert!(result.is_pending());
    assert_eq!(result.await, Ok(Some(8)));
}

#[rstest]
fn test_clone_shares_branches() {
    let original = fizz_buzz();
    let copy = original.clone();
    assert_eq!(copy.len(), original.len());
    assert!(copy.call(5).is_pending());
}

// =============================================================================
// Combinators
// =============================================================================

#[rstest]
#[case(6, true, true)]
#[case(4, false, true)]
#[case(9, false, true)]
#[case(7, false, false)]
#[tokio::test]
async fn test_and_or_over_pending_predicates(
    #[case] value: i32,
    #[case] both: bool,
    #[case] either: bool,
) {
    let even = || Predicate::new(|value: &i32| deferred(value % 2 == 0));
    let triple = || Predicate::new(|value: &i32| Flow::ready(value % 3 == 0));
    assert_eq!(and([even(), triple()]).test(&value).await, Ok(both));
    assert_eq!(or([even(), triple()]).test(&value).await, Ok(either));
}

#[rstest]
fn test_not_and_negate() {
    let small = Predicate::<i32>::new(|value: &i32| Flow::ready(*value < 10));
    assert_eq!(not(small.test(&3)).ok(), Some(false));
    assert_eq!(small.negate().test(&30).ok(), Some(true));
}
