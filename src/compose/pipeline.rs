//! Builders for composed pipelines: [`Pipeline`] and the [`pipeline!`] macro.
//!
//! [`pipeline!`]: crate::pipeline

use std::sync::Arc;

use super::stage::{Composed, Head, Stage, catch, stage};
use crate::error::Error;
use crate::flow::Flow;

/// Anything that can become a pipeline [`Stage`].
///
/// Implemented for stages themselves, for closures `Fn(T) -> Flow<T, E>`
/// and for composed pipelines whose input and output types agree.
pub trait IntoStage<T, E> {
    /// Converts `self` into a stage.
    fn into_stage(self) -> Stage<T, E>;
}

impl<T, E> IntoStage<T, E> for Stage<T, E> {
    fn into_stage(self) -> Self {
        self
    }
}

impl<T, E, F> IntoStage<T, E> for F
where
    F: Fn(T) -> Flow<T, E> + Send + Sync + 'static,
{
    fn into_stage(self) -> Stage<T, E> {
        stage(self)
    }
}

impl<T, E> IntoStage<T, E> for Composed<T, T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_stage(self) -> Stage<T, E> {
        Self::into_stage(self)
    }
}

/// A step-by-step builder for [`Composed`] pipelines.
///
/// [`Pipeline::pipe`] may change the carried type; error handlers added
/// with [`Pipeline::catch`] recover to the type carried at that point.
///
/// # Examples
///
/// ```rust
/// use flowless::compose::Pipeline;
/// use flowless::error::Error;
/// use flowless::flow::Flow;
///
/// let parse = Pipeline::new(|text: &'static str| {
///     Flow::from(text.parse::<i32>().map_err(|error| Error::failed(error.to_string())))
/// })
/// .pipe(|value| Flow::ready(value * 2))
/// .catch(|_| Flow::ready(0))
/// .pipe(|value| Flow::ready(format!("#{value}")))
/// .build();
///
/// assert_eq!(parse.apply("21").ok(), Some("#42".to_string()));
/// assert_eq!(parse.apply("many").ok(), Some("#0".to_string()));
/// ```
pub struct Pipeline<A, T, E = Error> {
    head: Arc<Head<A, T, E>>,
    stages: Vec<Stage<T, E>>,
    folded: usize,
}

impl<A, T, E> Pipeline<A, T, E>
where
    A: 'static,
    T: 'static,
    E: 'static,
{
    /// Starts a pipeline with the function receiving the arguments.
    pub fn new<F>(head: F) -> Self
    where
        F: Fn(A) -> Flow<T, E> + Send + Sync + 'static,
    {
        Self {
            head: Arc::new(head),
            stages: Vec::new(),
            folded: 0,
        }
    }

    /// Appends a normal stage, possibly changing the carried type.
    #[must_use]
    pub fn pipe<U, F>(self, step: F) -> Pipeline<A, U, E>
    where
        A: Send,
        T: Send,
        E: Send,
        U: Send + 'static,
        F: Fn(T) -> Flow<U, E> + Send + Sync + 'static,
    {
        let composed = self.build().then_map(step);
        Pipeline {
            folded: composed.len(),
            head: Arc::new(move |arguments: A| composed.apply(arguments)),
            stages: Vec::new(),
        }
    }

    /// Appends an error-handler stage.
    #[must_use]
    pub fn catch<H>(mut self, handler: H) -> Self
    where
        H: Fn(E) -> Flow<T, E> + Send + Sync + 'static,
    {
        self.stages.push(catch(handler));
        self
    }

    /// Appends anything convertible into a stage.
    #[must_use]
    pub fn then(mut self, next: impl IntoStage<T, E>) -> Self {
        self.stages.push(next.into_stage());
        self
    }

    /// Finishes the pipeline.
    pub fn build(self) -> Composed<A, T, E> {
        Composed::from_parts(self.head, self.stages, self.folded)
    }
}

/// Composes a head function with any number of stages, left to right.
///
/// Stages may be closures, [`stage`](crate::compose::stage) or
/// [`catch`](crate::compose::catch) values, or other composed pipelines.
/// Closures used as stages need an annotated parameter type.
///
/// # Examples
///
/// ```rust
/// use flowless::compose::catch;
/// use flowless::error::Error;
/// use flowless::flow::Flow;
/// use flowless::pipeline;
///
/// let checked = pipeline![
///     |value: i32| if value < 0 { Flow::failed(Error::failed("negative")) } else { Flow::ready(value) },
///     |value: i32| Flow::ready(value + 1),
///     catch(|_| Flow::ready(0)),
/// ];
/// assert_eq!(checked.apply(4).ok(), Some(5));
/// assert_eq!(checked.apply(-4).ok(), Some(0));
/// ```
#[macro_export]
macro_rules! pipeline {
    ($head:expr $(,)?) => {
        $crate::compose::compose($head, ::std::vec::Vec::new())
    };

    ($head:expr, $($stage:expr),+ $(,)?) => {
        $crate::compose::compose(
            $head,
            ::std::vec![$($crate::compose::IntoStage::into_stage($stage)),+],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_pipeline_builder_runs_stages_in_order() {
        let composed = Pipeline::new(|value: i32| Flow::<i32>::ready(value))
            .pipe(|value| Flow::ready(value + 1))
            .pipe(|value| Flow::ready(value * 10))
            .build();
        assert_eq!(composed.len(), 2);
        assert_eq!(composed.apply(1).ok(), Some(20));
    }

    #[rstest]
    fn test_pipeline_then_accepts_composed() {
        let inner = Pipeline::new(|value: i32| Flow::<i32>::ready(value - 1)).build();
        let composed = Pipeline::new(|value: i32| Flow::ready(value)).then(inner).build();
        assert_eq!(composed.apply(1).ok(), Some(0));
    }

    #[rstest]
    fn test_pipeline_macro_with_head_only() {
        let composed = pipeline![|value: i32| Flow::<i32>::ready(value * 3)];
        assert!(composed.is_empty());
        assert_eq!(composed.apply(2).ok(), Some(6));
    }

    #[rstest]
    fn test_pipeline_macro_mixes_closures_and_handlers() {
        let composed = pipeline![
            |value: i32| Flow::<i32>::failed(Error::failed(format!("{value}"))),
            |value: i32| Flow::ready(value + 1),
            catch(|_: Error| Flow::ready(-1)),
        ];
        assert_eq!(composed.apply(9).ok(), Some(-1));
    }

    #[rstest]
    fn test_pipeline_pipe_changes_type_and_catch_recovers_to_it() {
        let describe = Pipeline::new(|text: &'static str| {
            Flow::from(text.parse::<i32>().map_err(|error| Error::failed(error.to_string())))
        })
        .pipe(|number| Flow::ready(format!("n={number}")))
        .catch(|_| Flow::ready("n=?".to_string()))
        .pipe(|label: String| Flow::ready(label.len()))
        .build();
        assert_eq!(describe.len(), 3);
        assert_eq!(describe.apply("12").ok(), Some(4));
        assert_eq!(describe.apply("x").ok(), Some(3));
    }
}
