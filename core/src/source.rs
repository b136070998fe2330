//! Reactive sources.
//!
//! A [`Source`] is a cold, cloneable description of a reactive value: every call
//! to [`Source::subscribe`] produces an independent stream. A [`Replay`] is the
//! hot counterpart, a settable variable that replays its latest value to every
//! new subscriber and pushes later updates to all live ones.
//!
//! Everything here is single-threaded. Streams are `LocalBoxStream`s and handles
//! share state through `Rc`.

use core::{any::type_name, fmt};
use std::{cell::RefCell, rc::Rc};

use async_channel::Sender;
use futures::{
    Stream, StreamExt, future,
    stream::{self, LocalBoxStream},
};

/// A cloneable, subscribable reactive source.
pub struct Source<T> {
    factory: Rc<dyn Fn() -> LocalBoxStream<'static, T>>,
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
        }
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(type_name::<Self>())
    }
}

impl<T: 'static> Source<T> {
    /// Creates a source from a stream factory, called once per subscriber.
    pub fn new<F, S>(factory: F) -> Self
    where
        F: Fn() -> S + 'static,
        S: Stream<Item = T> + 'static,
    {
        Self {
            factory: Rc::new(move || factory().boxed_local()),
        }
    }

    /// A source that never emits and never completes.
    #[must_use]
    pub fn never() -> Self {
        Self::new(stream::pending)
    }

    /// Opens a new subscription.
    #[must_use]
    pub fn subscribe(&self) -> LocalBoxStream<'static, T> {
        (self.factory)()
    }

    /// Transforms every value emitted by this source.
    #[must_use]
    pub fn map<U, F>(&self, f: F) -> Source<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let source = self.clone();
        let f = Rc::new(f);
        Source::new(move || {
            let f = f.clone();
            source.subscribe().map(move |value| f(value))
        })
    }

    /// Returns `true` if both handles refer to the same source.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.factory, &other.factory)
    }
}

impl<T: Clone + 'static> Source<T> {
    /// A source emitting `value` once to every subscriber, then completing.
    ///
    /// Late subscribers observe the same value, which makes this the replayable
    /// single-value source used for static props.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self::new(move || stream::once(future::ready(value.clone())))
    }

    /// A source emitting a fixed sequence to every subscriber, then completing.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        let values: Rc<[T]> = values.into_iter().collect();
        Self::new(move || stream::iter(values.to_vec()))
    }
}

impl<T: Clone + 'static> From<Replay<T>> for Source<T> {
    fn from(value: Replay<T>) -> Self {
        value.source()
    }
}

/// A hot reactive variable that replays its latest value.
///
/// Subscribers arriving after a value was set still observe it first, followed
/// by every later update. Subscriptions are released when their stream is
/// dropped; the replay prunes them on the next [`Replay::set`].
pub struct Replay<T> {
    state: Rc<RefCell<ReplayState<T>>>,
}

struct ReplayState<T> {
    latest: Option<T>,
    subscribers: Vec<Sender<T>>,
    closed: bool,
}

impl<T> Clone for Replay<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Replay<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Replay")
            .field("latest", &state.latest)
            .field("subscribers", &state.subscribers.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl<T: Clone + 'static> Default for Replay<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Replay<T> {
    /// Creates an empty replay. Subscribers wait for the first [`Replay::set`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ReplayState {
                latest: None,
                subscribers: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Creates a replay holding an initial value.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        let replay = Self::new();
        replay.set(value);
        replay
    }

    /// Publishes a new value to every live subscriber.
    ///
    /// Has no effect once the replay is closed.
    pub fn set(&self, value: T) {
        let mut state = self.state.borrow_mut();
        if state.closed {
            tracing::trace!("ignoring value published to a closed replay");
            return;
        }
        state
            .subscribers
            .retain(|subscriber| subscriber.try_send(value.clone()).is_ok());
        state.latest = Some(value);
    }

    /// Returns the latest value, if any was set.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.state.borrow().latest.clone()
    }

    /// Completes every subscription. Later subscribers receive the latest value
    /// and then complete immediately.
    pub fn close(&self) {
        let mut state = self.state.borrow_mut();
        state.closed = true;
        state.subscribers.clear();
    }

    /// Opens a new subscription, starting with the latest value.
    #[must_use]
    pub fn subscribe(&self) -> LocalBoxStream<'static, T> {
        let (sender, receiver) = async_channel::unbounded();
        let mut state = self.state.borrow_mut();
        if let Some(latest) = &state.latest {
            // The receiver is alive in this scope, so the send cannot fail.
            let _ = sender.try_send(latest.clone());
        }
        if !state.closed {
            state.subscribers.push(sender);
        }
        receiver.boxed_local()
    }

    /// Returns a cold [`Source`] view of this replay.
    #[must_use]
    pub fn source(&self) -> Source<T> {
        let replay = self.clone();
        Source::new(move || replay.subscribe())
    }

    /// Number of subscriptions that are still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.subscribers.retain(|subscriber| !subscriber.is_closed());
        state.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{FutureExt, executor::block_on_stream};

    #[test]
    fn constant_replays_to_every_subscriber() {
        let source = Source::constant("yes".to_string());
        let first: Vec<_> = block_on_stream(source.subscribe()).collect();
        let second: Vec<_> = block_on_stream(source.subscribe()).collect();
        assert_eq!(first, vec!["yes".to_string()]);
        assert_eq!(second, first);
    }

    #[test]
    fn map_applies_to_each_value() {
        let source = Source::from_values([1, 2, 3]).map(|n| n * 10);
        let values: Vec<_> = block_on_stream(source.subscribe()).collect();
        assert_eq!(values, vec![10, 20, 30]);
    }

    #[test]
    fn never_stays_pending() {
        let mut stream = Source::<u8>::never().subscribe();
        assert!(stream.next().now_or_never().is_none());
    }

    #[test]
    fn late_subscriber_sees_latest_value() {
        let replay = Replay::new();
        replay.set(1);
        replay.set(2);

        let mut stream = replay.subscribe();
        assert_eq!(stream.next().now_or_never(), Some(Some(2)));
        assert!(stream.next().now_or_never().is_none());

        replay.set(3);
        assert_eq!(stream.next().now_or_never(), Some(Some(3)));
    }

    #[test]
    fn close_completes_subscriptions() {
        let replay = Replay::with_value("a");
        let mut early = replay.subscribe();
        replay.close();

        assert_eq!(early.next().now_or_never(), Some(Some("a")));
        assert_eq!(early.next().now_or_never(), Some(None));

        let late: Vec<_> = block_on_stream(replay.subscribe()).collect();
        assert_eq!(late, vec!["a"]);
    }

    #[test]
    fn dropped_subscriptions_are_released() {
        let replay = Replay::with_value(0);
        let first = replay.subscribe();
        let _second = replay.subscribe();
        assert_eq!(replay.subscriber_count(), 2);

        drop(first);
        assert_eq!(replay.subscriber_count(), 1);
    }

    #[test]
    fn source_handles_compare_by_identity() {
        let replay = Replay::with_value(1);
        let a = replay.source();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&replay.source()));
    }
}
