//! Polymorphic traversal over container shapes.
//!
//! Every algorithm here works on any [`Container`] and keeps its shape:
//! mapping a set gives a set, filtering a mapping gives a mapping. Per-entry
//! callbacks receive the value and its [`Key`], and may return settled or
//! pending flows; the algorithm merges them into one result that is settled
//! when every part was settled and pending otherwise.
//!
//! # Algorithms
//!
//! | Function | Result | Evaluation |
//! |----------|--------|------------|
//! | [`for_each`] | `Flow<()>` | in order, side effects only |
//! | [`map`] | same shape | fan-in, input order kept |
//! | [`filter`] | same shape | fan-in, input order kept |
//! | [`sync`] | same shape, flows resolved | fan-in, input order kept |
//! | [`reduce`] | accumulator | strictly sequential |
//! | [`find`] | first match | first in order |
//! | [`some`] / [`every`] | `bool` | short-circuiting |
//!
//! # Streams
//!
//! A [`PushStream`] is consumed chunk by chunk. `map` and `filter` return a
//! new stream driven by the source; `find`, `some`, `every` and `reduce`
//! return a pending flow. The source is not polled while a chunk's pending
//! step is outstanding, and it is dropped on match, end, or error.
//!
//! # Bounds
//!
//! Any [`Element`] can be visited. Only the traversals that rebuild a
//! container need [`Unique`] values, because the rebuilt container may be a
//! set or a map; [`map_sequence`] and [`filter_sequence`] cover plain
//! sequences of values without `Hash`, such as floats.
//!
//! # Examples
//!
//! ```rust
//! use flowless::flow::Flow;
//! use flowless::traverse::{Container, filter, map};
//!
//! let numbers: Container<i32> = Container::mapping([("a", 1), ("b", -2)]);
//! let positive = filter(|value: &i32, _| Flow::ready(*value > 0), numbers).ok().unwrap();
//! let labelled = map(|value, _| Flow::ready(value * 100), positive);
//! assert_eq!(labelled.ok(), Some(Container::mapping([("a", 100)])));
//! ```

mod collect;
mod container;
mod fold;
mod search;
mod stream;

pub use collect::{filter, filter_sequence, map, map_sequence, sync};
pub use container::{Container, Element, Key, Shape, Unique};
pub use fold::{Reducer, for_each, reduce, reduce_with};
pub use search::{every, find, some};
pub use stream::{PushStream, StreamWriter};

/// An inclusive integer range, ascending or descending.
///
/// Created by [`range`] and [`range_to`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range {
    next: Option<i64>,
    end: i64,
}

/// Counts from `from` to `to`, both included, upwards or downwards.
///
/// ```rust
/// use flowless::traverse::range;
///
/// assert_eq!(range(1, 4).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
/// assert_eq!(range(3, 1).collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
pub const fn range(from: i64, to: i64) -> Range {
    Range {
        next: Some(from),
        end: to,
    }
}

/// Counts from zero to `to`, both included.
pub const fn range_to(to: i64) -> Range {
    range(0, to)
}

impl Iterator for Range {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let current = self.next?;
        self.next = match current.cmp(&self.end) {
            std::cmp::Ordering::Less => Some(current + 1),
            std::cmp::Ordering::Greater => Some(current - 1),
            std::cmp::Ordering::Equal => None,
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let Some(current) = self.next else {
            return (0, Some(0));
        };
        match usize::try_from(current.abs_diff(self.end)) {
            Ok(span) if span < usize::MAX => (span + 1, Some(span + 1)),
            _ => (usize::MAX, None),
        }
    }
}

impl<K, E> From<Range> for Container<i64, K, E> {
    fn from(range: Range) -> Self {
        Self::Sequence(range.collect())
    }
}
