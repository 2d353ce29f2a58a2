//! Control flow over possibly pending conditions.
//!
//! This module provides:
//!
//! - [`if_else`] / [`Conditional`]: `if` / `else if` / `else` chains whose
//!   predicates may be pending
//! - [`Predicate`]: a shareable test over borrowed values
//! - [`IntoPredicate`]: what a conditional or combinator accepts as a
//!   condition (closures, predicates and, with the `pattern` feature,
//!   structural patterns)
//! - [`and`], [`or`], [`not`], [`eq`]: boolean combinators
//!
//! # Examples
//!
//! ```rust
//! use flowless::control::{and, eq, if_else, Predicate};
//! use flowless::flow::Flow;
//!
//! let small: Predicate<i32> = Predicate::new(|value: &i32| Flow::ready(*value < 10));
//! let odd = Predicate::new(|value: &i32| Flow::ready(value % 2 == 1));
//!
//! let describe = if_else(and([small, odd]), |_| Flow::ready("small and odd"))
//!     .else_if(eq(42), |_| Flow::ready("the answer"));
//!
//! assert_eq!(describe.call(3).ok(), Some(Some("small and odd")));
//! assert_eq!(describe.call(42).ok(), Some(Some("the answer")));
//! assert_eq!(describe.call(12).ok(), Some(None));
//! ```

mod conditional;
mod predicate;

pub use conditional::{Conditional, if_else};
pub use predicate::{IntoPredicate, Predicate, and, eq, not, or};
