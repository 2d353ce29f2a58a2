//! Function composition with transparent suspension.
//!
//! This module builds pipelines whose steps may return settled or pending
//! [`Flow`](crate::flow::Flow)s. A pipeline runs synchronously as long as
//! every step is settled and turns into a single pending flow the moment a
//! step goes pending.
//!
//! # Overview
//!
//! - [`compose`]: a head function followed by [`Stage`]s, left to right
//! - [`stage`] / [`catch`]: normal and error-handler stages
//! - [`Pipeline`] and [`pipeline!`]: builders for the same thing;
//!   [`Pipeline::pipe`] and [`Composed::then_map`] may change the carried type
//! - [`curry_n`]: argument accumulation with placeholders
//!
//! # Helper Functions
//!
//! - [`identity`], [`lift`], [`fallible`], [`constant`]
//! - [`__`]: the placeholder for curried calls
//!
//! # Error handlers
//!
//! A pipeline carries either a value or an error. Normal stages only see
//! values and error handlers only see errors; whichever does not apply is
//! skipped. A handler may recover, so the pipeline can switch back to
//! carrying a value:
//!
//! ```text
//! head ──ok──▶ stage ──err──▶ stage (skipped) ──err──▶ catch ──ok──▶ stage
//! ```
//!
//! The same rules hold after the pipeline went pending: a rejection skips
//! normal stages until the next handler.
//!
//! # Examples
//!
//! ```rust
//! use flowless::compose::{catch, compose, stage};
//! use flowless::error::Error;
//! use flowless::flow::Flow;
//!
//! let reciprocal = compose(
//!     |value: i32| {
//!         if value == 0 {
//!             Flow::failed(Error::failed("zero"))
//!         } else {
//!             Flow::ready(100 / value)
//!         }
//!     },
//!     vec![stage(|value| Flow::ready(value + 1)), catch(|_| Flow::ready(0))],
//! );
//! assert_eq!(reciprocal.apply(4).ok(), Some(26));
//! assert_eq!(reciprocal.apply(0).ok(), Some(0));
//! ```
//!
//! # Laws
//!
//! - **Identity**: `compose(f, vec![]).apply(x) == f(x)`
//! - **Suspension**: `compose(f, gs).call(pending(x))` resolves to
//!   `compose(f, gs).apply(x)`

mod curry;
mod pipeline;
mod stage;
mod utils;

pub use curry::{Applied, Curried, MAX_ARITY, Slot, curry_n};
pub use pipeline::{IntoStage, Pipeline};
pub use stage::{Composed, Role, Stage, catch, compose, compose_stages, stage};
pub use utils::{__, Placeholder, constant, fallible, identity, lift};

pub use crate::pipeline;
