//! Stream combinators used by the resolver.
//!
//! [`CombineLatest`] is the fan-in that joins sibling subtrees into their parent,
//! [`Switch`] follows the latest of a stream of streams and drops the previous one
//! so that superseded render generations release their subscriptions.

use core::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{
    Stream, StreamExt,
    stream::{Fuse, LocalBoxStream},
};
use pin_project_lite::pin_project;

use crate::RenderError;

/// A fallible stream as produced by the resolver.
pub type Fallible<T> = LocalBoxStream<'static, Result<T, RenderError>>;

/// Fan-in over an ordered list of fallible streams.
///
/// The first value is emitted once every participant has produced at least one
/// value. Afterwards every value of any participant produces one emission,
/// reusing the latest value of the others.
///
/// Each poll takes at most one value per participant, starting after the
/// participant that produced the previous emission, so a participant that is
/// always ready cannot starve the others.
///
/// An error from any participant is forwarded and ends the stream. A participant
/// that completes without ever emitting also ends the stream, since no combined
/// value can exist from then on.
#[must_use = "streams do nothing unless polled"]
pub struct CombineLatest<T> {
    participants: Vec<Option<Fallible<T>>>,
    latest: Vec<Option<T>>,
    cursor: usize,
    done: bool,
}

impl<T> core::fmt::Debug for CombineLatest<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombineLatest")
            .field("participants", &self.participants.len())
            .field(
                "ready",
                &self.latest.iter().filter(|value| value.is_some()).count(),
            )
            .field("done", &self.done)
            .finish()
    }
}

impl<T> CombineLatest<T> {
    /// Combines the given participants, preserving their order in the output.
    pub fn new(participants: impl IntoIterator<Item = Fallible<T>>) -> Self {
        let participants: Vec<_> = participants.into_iter().map(Some).collect();
        let latest = participants.iter().map(|_| None).collect();
        Self {
            participants,
            latest,
            cursor: 0,
            done: false,
        }
    }
}

impl<T> Unpin for CombineLatest<T> {}

impl<T: Clone> Stream for CombineLatest<T> {
    type Item = Result<Vec<T>, RenderError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.done {
            return Poll::Ready(None);
        }
        let count = this.participants.len();
        if count == 0 {
            this.done = true;
            return Poll::Ready(Some(Ok(Vec::new())));
        }

        let mut progressed = false;
        for offset in 0..count {
            let index = (this.cursor + offset) % count;
            let Some(participant) = this.participants[index].as_mut() else {
                continue;
            };
            match participant.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(value))) => {
                    this.latest[index] = Some(value);
                    if this.latest.iter().all(Option::is_some) {
                        this.cursor = (index + 1) % count;
                        let values = this.latest.iter().flatten().cloned().collect();
                        return Poll::Ready(Some(Ok(values)));
                    }
                    progressed = true;
                }
                Poll::Ready(Some(Err(error))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(error)));
                }
                Poll::Ready(None) => {
                    this.participants[index] = None;
                    if this.latest[index].is_none() {
                        this.done = true;
                        return Poll::Ready(None);
                    }
                }
                Poll::Pending => {}
            }
        }

        if this.participants.iter().all(Option::is_none) {
            this.done = true;
            return Poll::Ready(None);
        }
        if progressed {
            // A participant that yielded a value was not polled to `Pending`, so
            // nothing will wake this task for it.
            cx.waker().wake_by_ref();
        }
        Poll::Pending
    }
}

pin_project! {
    /// Flattens a stream of streams by following the most recent one.
    ///
    /// Every inner stream is polled as soon as the outer stream yields it, so
    /// values it has ready are not lost. When the outer stream yields a new
    /// inner stream the current one is dropped first. The switch completes once
    /// the outer stream and the current inner stream have both completed.
    #[must_use = "streams do nothing unless polled"]
    pub struct Switch<S>
    where
        S: Stream,
    {
        #[pin]
        outer: Fuse<S>,
        inner: Option<S::Item>,
    }
}

impl<S> core::fmt::Debug for Switch<S>
where
    S: Stream,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Switch")
            .field("outer_done", &self.outer.is_done())
            .field("has_inner", &self.inner.is_some())
            .finish()
    }
}

impl<S> Switch<S>
where
    S: Stream,
    S::Item: Stream + Unpin,
{
    /// Creates a switch over `outer`.
    pub fn new(outer: S) -> Self {
        Self {
            outer: outer.fuse(),
            inner: None,
        }
    }
}

impl<S> Stream for Switch<S>
where
    S: Stream,
    S::Item: Stream + Unpin,
{
    type Item = <S::Item as Stream>::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(inner) = this.inner.as_mut() {
                match inner.poll_next_unpin(cx) {
                    Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                    Poll::Ready(None) => *this.inner = None,
                    Poll::Pending => {}
                }
            }

            match this.outer.as_mut().poll_next(cx) {
                Poll::Ready(Some(next)) => {
                    this.inner.take();
                    *this.inner = Some(next);
                }
                Poll::Ready(None) if this.inner.is_none() => return Poll::Ready(None),
                Poll::Ready(None) | Poll::Pending => return Poll::Pending,
            }
        }
    }
}
