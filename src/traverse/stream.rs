//! Push streams and the traversal adapters that consume them.
//!
//! A [`PushStream`] is a live sequence of chunks that ends once, either
//! cleanly or with an error item. Producers push through a
//! [`StreamWriter`]; any `futures::Stream` of results can be adapted as well.
//!
//! The adapters below are what the traversal algorithms dispatch to when
//! they are handed a stream. They pull one chunk at a time and do not pull
//! the next chunk while the current chunk's transform or predicate is still
//! pending, which pauses the source. The first failure (a source error item
//! or a rejected per-chunk step) is reported once and ends consumption; the
//! source is dropped, releasing its subscription, on every exit path.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::mpsc;
use futures::stream::{self, BoxStream, Stream, StreamExt};

use super::container::Key;
use crate::error::Error;
use crate::flow::Flow;

/// A live, push-driven stream of chunks.
///
/// Items are `Ok(chunk)` or a single terminal `Err(error)`.
///
/// # Examples
///
/// ```rust,ignore
/// use flowless::traverse::PushStream;
///
/// let (writer, stream) = PushStream::<i32>::channel();
/// writer.write(1)?;
/// writer.write(2)?;
/// writer.end();
/// ```
pub struct PushStream<T, E = Error> {
    inner: BoxStream<'static, Result<T, E>>,
}

static_assertions::assert_impl_all!(PushStream<i32>: Send, Unpin);

impl<T: Send + 'static, E: Send + 'static> PushStream<T, E> {
    /// Adapts any stream of results.
    pub fn new<S>(source: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'static,
    {
        Self {
            inner: source.boxed(),
        }
    }

    /// A stream that has already ended.
    pub fn empty() -> Self {
        Self::new(stream::empty())
    }

    /// Creates a stream fed by the returned writer.
    pub fn channel() -> (StreamWriter<T, E>, Self) {
        let (sender, receiver) = mpsc::unbounded();
        (StreamWriter { sender }, Self::new(receiver))
    }
}

impl<T: Send + 'static, E: Send + 'static> FromIterator<T> for PushStream<T, E> {
    /// Replays the chunks of an iterator, then ends.
    fn from_iter<I: IntoIterator<Item = T>>(chunks: I) -> Self {
        let chunks: Vec<T> = chunks.into_iter().collect();
        Self::new(stream::iter(chunks.into_iter().map(Ok)))
    }
}

impl<T, E> Stream for PushStream<T, E> {
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(context)
    }
}

impl<T, E> fmt::Debug for PushStream<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("PushStream").finish_non_exhaustive()
    }
}

/// The producing side of a [`PushStream::channel`].
pub struct StreamWriter<T, E = Error> {
    sender: mpsc::UnboundedSender<Result<T, E>>,
}

impl<T, E> StreamWriter<T, E> {
    /// Pushes one chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StreamClosed`] if the stream has been dropped or
    /// already ended.
    pub fn write(&self, chunk: T) -> Result<(), Error> {
        self.sender
            .unbounded_send(Ok(chunk))
            .map_err(|_| Error::StreamClosed)
    }

    /// Ends the stream with an error item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StreamClosed`] if the stream has been dropped or
    /// already ended.
    pub fn fail(self, error: E) -> Result<(), Error> {
        let sent = self
            .sender
            .unbounded_send(Err(error))
            .map_err(|_| Error::StreamClosed);
        self.sender.close_channel();
        sent
    }

    /// Ends the stream cleanly. Chunks already written are still delivered.
    pub fn end(self) {
        self.sender.close_channel();
    }

    /// Returns `true` once the stream ended or its reader went away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<T, E> fmt::Debug for StreamWriter<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StreamWriter")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

pub(crate) fn for_each<T, K, E, F>(source: PushStream<T, E>, mut proc: F) -> Flow<(), E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut(T, &Key<K>) + Send + 'static,
{
    Flow::pending(async move {
        let mut source = source;
        let mut index = 0;
        while let Some(chunk) = source.next().await {
            proc(chunk?, &Key::Index(index));
            index += 1;
        }
        tracing::trace!(chunks = index, "stream ended");
        Ok(())
    })
}

pub(crate) fn map<T, U, K, E, F>(source: PushStream<T, E>, proc: F) -> PushStream<U, E>
where
    T: Send + 'static,
    U: Send + 'static,
    K: Send + 'static,
    E: Send + 'static,
    F: Fn(T, &Key<K>) -> Flow<U, E> + Send + Sync + 'static,
{
    let proc = Arc::new(proc);
    PushStream::new(stream::unfold(Some((source, 0_usize)), move |state| {
        let proc = Arc::clone(&proc);
        async move {
            let (mut source, index) = state?;
            let chunk = match source.next().await? {
                Ok(chunk) => chunk,
                Err(error) => return Some((Err(error), None)),
            };
            let key = Key::Index(index);
            let transformed = proc(chunk, &key);
            match transformed.await {
                Ok(value) => Some((Ok(value), Some((source, index + 1)))),
                Err(error) => {
                    tracing::debug!(index, "chunk transform failed, releasing source stream");
                    Some((Err(error), None))
                }
            }
        }
    }))
}

pub(crate) fn filter<T, K, E, F>(source: PushStream<T, E>, predicate: F) -> PushStream<T, E>
where
    T: Send + 'static,
    K: Send + 'static,
    E: Send + 'static,
    F: Fn(&T, &Key<K>) -> Flow<bool, E> + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    PushStream::new(stream::unfold(Some((source, 0_usize)), move |state| {
        let predicate = Arc::clone(&predicate);
        async move {
            let (mut source, mut index) = state?;
            loop {
                let chunk = match source.next().await? {
                    Ok(chunk) => chunk,
                    Err(error) => return Some((Err(error), None)),
                };
                let key = Key::Index(index);
                index += 1;
                let condition = predicate(&chunk, &key);
                match condition.await {
                    Ok(true) => return Some((Ok(chunk), Some((source, index)))),
                    Ok(false) => {}
                    Err(error) => {
                        tracing::debug!(index = index - 1, "chunk predicate failed, releasing source stream");
                        return Some((Err(error), None));
                    }
                }
            }
        }
    }))
}

pub(crate) fn reduce<T, K, E, A, F>(source: PushStream<T, E>, proc: F, seed: Flow<A, E>) -> Flow<A, E>
where
    T: Send + 'static,
    K: Send + 'static,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(A, T, &Key<K>) -> Flow<A, E> + Send + 'static,
{
    Flow::pending(async move {
        let mut accumulator = seed.await?;
        let mut source = source;
        let mut index = 0;
        while let Some(chunk) = source.next().await {
            let chunk = chunk?;
            let key = Key::Index(index);
            let step = proc(accumulator, chunk, &key);
            accumulator = step.await?;
            index += 1;
        }
        Ok(accumulator)
    })
}

pub(crate) fn find<T, K, E, F>(source: PushStream<T, E>, predicate: F) -> Flow<Option<T>, E>
where
    T: Send + 'static,
    K: Send + 'static,
    E: Send + 'static,
    F: Fn(&T, &Key<K>) -> Flow<bool, E> + Send + 'static,
{
    Flow::pending(async move {
        let mut source = source;
        let mut index = 0;
        while let Some(chunk) = source.next().await {
            let chunk = chunk?;
            let key = Key::Index(index);
            let condition = predicate(&chunk, &key);
            if condition.await? {
                tracing::trace!(index, "match found, releasing source stream");
                return Ok(Some(chunk));
            }
            index += 1;
        }
        Ok(None)
    })
}

pub(crate) fn some<T, K, E, F>(source: PushStream<T, E>, predicate: F) -> Flow<bool, E>
where
    T: Send + 'static,
    K: Send + 'static,
    E: Send + 'static,
    F: Fn(&T, &Key<K>) -> Flow<bool, E> + Send + 'static,
{
    find(source, predicate).map(|found| found.is_some())
}
