//! Property-based tests for traversal laws.
//!
//! ## Shape Laws
//! - **Shape Preservation**: `shape(map(f, c)) == shape(c)`
//! - **Size Preservation**: `size(map(f, c)) == size(c)`
//! - **Identity**: `map(identity, c) == c`, settled or pending
//!
//! ## Agreement with Iterators
//! - `filter` keeps the entries `Iterator::filter` keeps, in the same order
//! - `reduce` equals `Iterator::fold`, settled or pending
//! - `find` returns what `Iterator::find` returns, even with pending predicates
//!
//! ## Duality
//! - `every(p, c) == !some(!p, c)`

use std::task::Poll;

use flowless::error::Error;
use flowless::flow::Flow;
use flowless::traverse::{Container, Key, Shape, every, filter, find, map, reduce, some};
use futures::executor::block_on;
use indexmap::{IndexMap, IndexSet};
use proptest::prelude::*;

type Numbers = Container<i32, i32>;

fn deferred<T: Send + 'static>(value: T) -> Flow<T> {
    Flow::pending(async move {
        let mut yielded = false;
        futures::future::poll_fn(|context| {
            if yielded {
                Poll::Ready(())
            } else {
                yielded = true;
                context.waker().wake_by_ref();
                Poll::Pending
            }
        })
        .await;
        Ok(value)
    })
}

fn settle<T>(flow: Flow<T>) -> Result<T, Error> {
    block_on(flow.into_future())
}

fn build(shape: Shape, values: &[i32]) -> Numbers {
    match shape {
        Shape::Mapping => Container::mapping(
            values
                .iter()
                .enumerate()
                .map(|(index, value)| (format!("key{index}"), *value)),
        ),
        Shape::UniqueSet => Container::from(values.iter().copied().collect::<IndexSet<_>>()),
        Shape::AssocMap => Container::from(
            values
                .iter()
                .map(|value| (value.wrapping_mul(3), *value))
                .collect::<IndexMap<_, _>>(),
        ),
        Shape::Sequence | Shape::Stream => Container::from(values.to_vec()),
    }
}

fn values_of(container: Numbers) -> Vec<i32> {
    match container {
        Container::Sequence(items) => items,
        Container::Mapping(entries) => entries.into_values().collect(),
        Container::UniqueSet(items) => items.into_iter().collect(),
        Container::AssocMap(entries) => entries.into_values().collect(),
        Container::Stream(_) => Vec::new(),
    }
}

fn finite_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::Sequence),
        Just(Shape::Mapping),
        Just(Shape::UniqueSet),
        Just(Shape::AssocMap),
    ]
}

// =============================================================================
// Shape Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_map_preserves_shape_and_size(
        shape in finite_shape(),
        values in prop::collection::vec(any::<i32>(), 0..20),
    ) {
        let container = build(shape, &values);
        let size = container.len();
        let mapped = map(|value: i32, _| Flow::ready(i64::from(value) - 1), container).ok().unwrap();
        prop_assert_eq!(mapped.shape(), shape);
        prop_assert_eq!(mapped.len(), size);
    }

    #[test]
    fn prop_map_identity(
        shape in finite_shape(),
        values in prop::collection::vec(any::<i32>(), 0..20),
    ) {
        let settled = map(|value: i32, _| Flow::ready(value), build(shape, &values));
        prop_assert_eq!(settled.ok(), Some(build(shape, &values)));
        let pending = map(|value: i32, _| deferred(value), build(shape, &values));
        prop_assert_eq!(settle(pending).ok(), Some(build(shape, &values)));
    }
}

// =============================================================================
// Agreement with Iterators
// =============================================================================

proptest! {
    #[test]
    fn prop_filter_matches_iterator(
        shape in finite_shape(),
        values in prop::collection::vec(-50i32..50, 0..20),
    ) {
        let expected: Vec<i32> = values_of(build(shape, &values))
            .into_iter()
            .filter(|value| *value < 0)
            .collect();
        let kept = filter(
            |value: &i32, key: &Key<i32>| {
                let negative = *value < 0;
                if matches!(key, Key::Index(index) if index % 2 == 1) {
                    deferred(negative)
                } else {
                    Flow::ready(negative)
                }
            },
            build(shape, &values),
        );
        let kept = settle(kept).unwrap();
        prop_assert_eq!(kept.shape(), shape);
        prop_assert_eq!(values_of(kept), expected);
    }

    #[test]
    fn prop_reduce_matches_fold(
        values in prop::collection::vec(-1000i64..1000, 0..30),
        suspend_at in 0usize..30,
    ) {
        let expected = values.iter().fold(0i64, |sum, value| sum * 3 + value);
        let settled = reduce(
            |sum: i64, value: i64, _: &Key| Flow::ready(sum * 3 + value),
            Flow::<i64>::ready(0),
            Container::from(values.clone()),
        );
        prop_assert_eq!(settled.ok(), Some(expected));

        let suspended = reduce(
            move |sum: i64, value: i64, key: &Key| {
                if key.index() == Some(suspend_at) {
                    deferred(sum * 3 + value)
                } else {
                    Flow::ready(sum * 3 + value)
                }
            },
            Flow::ready(0),
            Container::from(values),
        );
        prop_assert_eq!(settle(suspended), Ok(expected));
    }

    #[test]
    fn prop_find_matches_iterator(
        values in prop::collection::vec(-20i32..20, 0..20),
        threshold in -20i32..20,
    ) {
        let expected = values.iter().copied().find(|value| *value > threshold);
        let found = find(
            move |value: &i32, key: &Key| {
                let matched = *value > threshold;
                if key.index().is_some_and(|index| index % 2 == 0) {
                    deferred(matched)
                } else {
                    Flow::ready(matched)
                }
            },
            Container::from(values),
        );
        prop_assert_eq!(settle(found), Ok(expected));
    }
}

// =============================================================================
// Duality
// =============================================================================

proptest! {
    #[test]
    fn prop_every_is_not_some_not(
        shape in finite_shape(),
        values in prop::collection::vec(-10i32..10, 0..15),
        bound in -10i32..10,
        pending in any::<bool>(),
    ) {
        let test = move |value: &i32| {
            let below = *value < bound;
            if pending { deferred(below) } else { Flow::ready(below) }
        };
        let all = every(move |value: &i32, _: &Key<i32>| test(value), build(shape, &values));
        let none_failing = some(
            move |value: &i32, _: &Key<i32>| test(value).map(|below| !below),
            build(shape, &values),
        )
        .map(|found| !found);
        prop_assert_eq!(settle(all), settle(none_failing));
    }
}
