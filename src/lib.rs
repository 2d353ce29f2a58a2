//! # flowless
//!
//! Functional composition and shape-preserving collection traversal that
//! transparently awaits deferred values.
//!
//! ## Overview
//!
//! Every function in this crate accepts and returns [`Flow`](flow::Flow)s:
//! values that are ready, failed, or pending. Work on settled values happens
//! immediately and in-process; the first pending value switches the
//! operation onto a single continuation that finishes the job once the value
//! resolves. Callers never have to choose between a synchronous and an
//! asynchronous variant of an operation.
//!
//! - **Flows**: [`Flow`](flow::Flow), fan-in with [`await_all`](flow::await_all)
//!   and [`Gather`](flow::Gather)
//! - **Composition**: [`compose`](compose::compose), error-handler stages
//!   with [`catch`](compose::catch), [`pipeline!`], [`curry_n`](compose::curry_n)
//! - **Control**: [`if_else`](control::if_else) chains and predicate
//!   combinators
//! - **Traversal**: `map`, `filter`, `reduce`, `find`, `some`, `every` and
//!   `for_each` over sequences, mappings, sets, associative maps and push
//!   streams, see [`traverse`]
//! - **Patterns**: structural matching over JSON values (feature `pattern`)
//!
//! ## Feature Flags
//!
//! - `pattern` (default): structural matchers over `serde_json::Value`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use flowless::prelude::*;
//!
//! let numbers: Container<i32> = Container::from(vec![7, -1, 6, -2, 8, 9, -4]);
//! let negatives = filter(|value: &i32, _| Flow::ready(*value < 0), numbers);
//! assert_eq!(negatives.ok(), Some(Container::from(vec![-1, -2, -4])));
//! ```
//!
//! ## Logging
//!
//! Suspension points and stream releases emit `tracing` events at `trace`
//! and `debug` level. The crate never installs a subscriber.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types, traits and functions.
///
/// # Usage
///
/// ```rust
/// use flowless::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compose::*;
    pub use crate::control::*;
    pub use crate::error::Error;
    pub use crate::flow::*;
    pub use crate::traverse::*;

    #[cfg(feature = "pattern")]
    pub use crate::pattern::*;
}

pub mod compose;
pub mod control;
pub mod error;
pub mod flow;
pub mod traverse;

#[cfg(feature = "pattern")]
pub mod pattern;

pub use error::{Error, Result};
