//! Pipeline stages and the composed function that runs them.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::flow::{Deferred, Flow, Gather};

/// Whether a stage handles values or errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Runs on a value; skipped while the pipeline carries an error.
    Normal,
    /// Runs on an error; skipped while the pipeline carries a value.
    ErrorHandler,
}

type Step<T, E> = dyn Fn(T) -> Flow<T, E> + Send + Sync;
type Handler<T, E> = dyn Fn(E) -> Flow<T, E> + Send + Sync;

enum Action<T, E> {
    Normal(Arc<Step<T, E>>),
    ErrorHandler(Arc<Handler<T, E>>),
}

/// One step of a composed pipeline.
///
/// Create normal stages with [`stage`] and error handlers with [`catch`].
/// Stages are `Arc`-backed and cheap to clone.
pub struct Stage<T, E = Error> {
    action: Action<T, E>,
}

impl<T, E> Stage<T, E> {
    /// Returns the role of this stage.
    pub const fn role(&self) -> Role {
        match self.action {
            Action::Normal(_) => Role::Normal,
            Action::ErrorHandler(_) => Role::ErrorHandler,
        }
    }

    fn on_ready(&self, value: T) -> Flow<T, E> {
        match &self.action {
            Action::Normal(step) => step(value),
            Action::ErrorHandler(_) => Flow::Ready(value),
        }
    }

    fn on_failed(&self, error: E) -> Flow<T, E> {
        match &self.action {
            Action::Normal(_) => Flow::Failed(error),
            Action::ErrorHandler(handler) => handler(error),
        }
    }
}

impl<T, E> Clone for Stage<T, E> {
    fn clone(&self) -> Self {
        let action = match &self.action {
            Action::Normal(step) => Action::Normal(Arc::clone(step)),
            Action::ErrorHandler(handler) => Action::ErrorHandler(Arc::clone(handler)),
        };
        Self { action }
    }
}

impl<T, E> fmt::Debug for Stage<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Stage").field("role", &self.role()).finish_non_exhaustive()
    }
}

/// Creates a normal stage.
pub fn stage<T, E, F>(step: F) -> Stage<T, E>
where
    F: Fn(T) -> Flow<T, E> + Send + Sync + 'static,
{
    Stage {
        action: Action::Normal(Arc::new(step)),
    }
}

/// Creates an error-handler stage.
///
/// The handler receives the error carried by the pipeline and may recover
/// with a value, fail again, or go pending.
///
/// # Examples
///
/// ```rust
/// use flowless::compose::{catch, compose};
/// use flowless::error::Error;
/// use flowless::flow::Flow;
///
/// let safe_divide = compose(
///     |(numerator, denominator): (i32, i32)| {
///         if denominator == 0 {
///             Flow::failed(Error::failed("division by zero"))
///         } else {
///             Flow::ready(numerator / denominator)
///         }
///     },
///     vec![catch(|_| Flow::ready(0))],
/// );
/// assert_eq!(safe_divide.call((Flow::ready(6), Flow::ready(0))).ok(), Some(0));
/// ```
pub fn catch<T, E, H>(handler: H) -> Stage<T, E>
where
    H: Fn(E) -> Flow<T, E> + Send + Sync + 'static,
{
    Stage {
        action: Action::ErrorHandler(Arc::new(handler)),
    }
}

pub(crate) type Head<A, T, E> = dyn Fn(A) -> Flow<T, E> + Send + Sync;

/// A function built from a head and a list of stages.
///
/// The head receives the whole argument value; stages then run left to
/// right. While the pipeline carries a value, normal stages run and error
/// handlers are skipped; once it carries an error (a synchronous failure or
/// a rejection), normal stages are skipped until an error handler runs.
/// Settled stages run in-process; the first pending value hands the
/// remaining stages to a continuation applying the same rules.
///
/// A failure left over after the last stage is returned as `Failed` when the
/// pipeline never went pending, and as a rejection otherwise.
pub struct Composed<A, T, E = Error> {
    head: Arc<Head<A, T, E>>,
    stages: Arc<[Stage<T, E>]>,
    folded: usize,
}

/// Composes `head` with `stages`, applied left to right.
///
/// # Examples
///
/// ```rust
/// use flowless::compose::{compose, stage};
/// use flowless::flow::Flow;
///
/// let add_then_double = compose(
///     |value: i32| Flow::<i32>::ready(value + 1),
///     vec![stage(|value| Flow::ready(value * 2))],
/// );
/// assert_eq!(add_then_double.apply(4).ok(), Some(10));
/// ```
pub fn compose<A, T, E, F>(head: F, stages: Vec<Stage<T, E>>) -> Composed<A, T, E>
where
    F: Fn(A) -> Flow<T, E> + Send + Sync + 'static,
{
    Composed {
        head: Arc::new(head),
        stages: stages.into(),
        folded: 0,
    }
}

/// Composes a dynamic list of stages whose first stage takes the argument.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `stages` is empty or starts with an
/// error handler.
pub fn compose_stages<T, E>(stages: Vec<Stage<T, E>>) -> Result<Composed<T, T, E>, Error> {
    let mut stages = stages.into_iter();
    let head = match stages.next().map(|first| first.action) {
        Some(Action::Normal(step)) => step,
        Some(Action::ErrorHandler(_)) => {
            return Err(Error::invalid_argument(
                "stages",
                "the first stage must not be an error handler",
            ));
        }
        None => return Err(Error::invalid_argument("stages", "at least one stage is required")),
    };
    Ok(Composed {
        head,
        stages: stages.collect(),
        folded: 0,
    })
}

impl<A, T, E> Composed<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// Calls the pipeline with possibly pending arguments.
    ///
    /// The head runs once every argument resolved; if any argument is
    /// pending, the whole call is pending.
    pub fn call<G>(&self, arguments: G) -> Flow<T, E>
    where
        G: Gather<E, Output = A>,
    {
        let head = Arc::clone(&self.head);
        let gathered = arguments.gather();
        if gathered.is_pending() {
            tracing::trace!("arguments pending, deferring the pipeline head");
        }
        run(gathered.and_then(move |arguments| head(arguments)), Arc::clone(&self.stages))
    }

    /// Calls the pipeline with a settled argument.
    pub fn apply(&self, argument: A) -> Flow<T, E> {
        run((self.head)(argument), Arc::clone(&self.stages))
    }

    /// Number of stages after the head.
    pub fn len(&self) -> usize {
        self.folded + self.stages.len()
    }

    /// Returns `true` if the pipeline is only a head.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a stage that may change the carried type.
    ///
    /// The pipeline so far becomes the head of the new one: a failure it
    /// carries skips `step` and reaches the next error handler, and a
    /// pending result defers `step` until it settles.
    #[must_use]
    pub fn then_map<U, F>(self, step: F) -> Composed<A, U, E>
    where
        U: Send + 'static,
        F: Fn(T) -> Flow<U, E> + Send + Sync + 'static,
    {
        let folded = self.len() + 1;
        let step = Arc::new(step);
        let head = move |argument: A| {
            let step = Arc::clone(&step);
            self.apply(argument).and_then(move |value| step(value))
        };
        Composed::from_parts(Arc::new(head), Vec::new(), folded)
    }
}

impl<A, T, E> Composed<A, T, E> {
    /// Assembles a pipeline whose head already runs `folded` earlier stages.
    pub(super) fn from_parts(head: Arc<Head<A, T, E>>, stages: Vec<Stage<T, E>>, folded: usize) -> Self {
        Self {
            head,
            stages: stages.into(),
            folded,
        }
    }
}

impl<T, E> Composed<T, T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Turns the whole pipeline into one normal stage of another pipeline.
    pub fn into_stage(self) -> Stage<T, E> {
        stage(move |value| self.apply(value))
    }
}

impl<A, T, E> Clone for Composed<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            head: Arc::clone(&self.head),
            stages: Arc::clone(&self.stages),
            folded: self.folded,
        }
    }
}

impl<A, T, E> fmt::Debug for Composed<A, T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Composed")
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

fn run<T, E>(mut state: Flow<T, E>, stages: Arc<[Stage<T, E>]>) -> Flow<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    for index in 0..stages.len() {
        state = match state {
            Flow::Ready(value) => stages[index].on_ready(value),
            Flow::Failed(error) => stages[index].on_failed(error),
            Flow::Pending(deferred) => {
                tracing::trace!(stage = index, "pipeline pending, chaining the remaining stages");
                return Flow::pending(resume(deferred, stages, index));
            }
        };
    }
    state
}

async fn resume<T, E>(deferred: Deferred<T, E>, stages: Arc<[Stage<T, E>]>, start: usize) -> Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let mut outcome = deferred.await;
    for index in start..stages.len() {
        let next = match outcome {
            Ok(value) => stages[index].on_ready(value),
            Err(error) => stages[index].on_failed(error),
        };
        outcome = next.await;
    }
    outcome
}
