use std::time::Duration;

use crate::event::Events;
use crate::source::Source;
use crate::sys;
use crate::{Interest, Result, Token};

/// Polls for readiness events on all registered sources.
///
/// `Poll` owns the selector: the kernel-backed registration table and
/// its blocking wait primitive. Sources are registered through the
/// [`Registry`] returned by [`registry`], after which [`poll`] blocks
/// until one of them transitions, the timeout elapses, or a [`Waker`]
/// fires.
///
/// # Edge-triggered draining
///
/// Readiness is delivered once per transition. After acting on an
/// event, perform I/O on the source until it fails with
/// [`is_would_block`]; a source that is never drained will never be
/// reported again.
///
/// # One waiter
///
/// `poll` takes `&mut self`: a given `Poll` is driven by exactly one
/// thread at a time. Registration through a [`Registry`] (or a clone
/// of it) is allowed from any thread, concurrently with the waiter.
///
/// # Examples
///
/// A single wait cycle over a readable pipe:
///
/// ```
/// use std::time::Duration;
/// use edge_net::unix::pipe;
/// use edge_net::{Events, Interest, Poll, Token};
///
/// let mut poll = Poll::new()?;
/// let mut events = Events::with_capacity(128);
///
/// let (sender, mut receiver) = pipe::new()?;
/// poll.registry()
///     .register(&mut receiver, Token(0), Interest::READABLE)?;
///
/// sender.write(b"ready")?;
///
/// poll.poll(&mut events, Some(Duration::from_millis(100)))?;
///
/// let event = events.iter().next().unwrap();
/// assert_eq!(event.token(), Token(0));
/// assert!(event.is_readable());
/// # edge_net::Result::Ok(())
/// ```
///
/// [`Registry`]: struct.Registry.html
/// [`registry`]: #method.registry
/// [`poll`]: #method.poll
/// [`Waker`]: struct.Waker.html
/// [`is_would_block`]: struct.Error.html#method.is_would_block
#[derive(Debug)]
pub struct Poll {
    registry: Registry,
}

/// Registers I/O sources with a [`Poll`] instance.
///
/// A `Registry` is a non-owning view of the selector held by its
/// `Poll`. It is obtained from [`Poll::registry`] and may be cloned
/// with [`try_clone`] to hand registration capability to other
/// threads; every clone refers to the same kernel-side registration
/// table.
///
/// [`Poll`]: struct.Poll.html
/// [`Poll::registry`]: struct.Poll.html#method.registry
/// [`try_clone`]: #method.try_clone
#[derive(Debug)]
pub struct Registry {
    selector: sys::Selector,
}

impl Poll {
    /// Returns a new `Poll` with an empty registration table.
    ///
    /// The selector descriptor is created with close-on-exec set.
    pub fn new() -> Result<Poll> {
        let selector = sys::Selector::new()?;
        Ok(Poll {
            registry: Registry { selector },
        })
    }

    /// Returns the registry backing this instance.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Waits for readiness events, blocking the calling thread.
    ///
    /// The batch is cleared, then filled with up to
    /// `events.capacity()` records. With `timeout` of `None` the call
    /// blocks until an event or an interrupt delivers; a zero
    /// duration polls without blocking. Interrupted waits are retried
    /// transparently. On failure the batch is left empty.
    ///
    /// Spurious returns with an empty batch are possible; callers
    /// should treat "no events" as a normal outcome.
    pub fn poll(&mut self, events: &mut Events, timeout: Option<Duration>) -> Result<()> {
        events.clear();
        self.registry.selector.select(events.sys_mut(), timeout)
    }
}

impl Registry {
    /// Registers an I/O source with the selector.
    ///
    /// Future readiness transitions of `source` that match
    /// `interests` are delivered to [`Poll::poll`] as events carrying
    /// `token`. Registering a source that is already present fails
    /// with an error whose [`is_already_exists`] is true; use
    /// [`reregister`] to change an existing registration.
    ///
    /// [`Poll::poll`]: struct.Poll.html#method.poll
    /// [`is_already_exists`]: struct.Error.html#method.is_already_exists
    /// [`reregister`]: #method.reregister
    pub fn register<S>(&self, source: &mut S, token: Token, interests: Interest) -> Result<()>
    where
        S: Source + ?Sized,
    {
        source.register(self, token, interests)
    }

    /// Replaces an existing registration in place.
    ///
    /// The token and interest set of the previous registration are
    /// discarded entirely. Re-registering a source that was never
    /// registered fails with an error whose [`is_not_found`] is true.
    ///
    /// [`is_not_found`]: struct.Error.html#method.is_not_found
    pub fn reregister<S>(&self, source: &mut S, token: Token, interests: Interest) -> Result<()>
    where
        S: Source + ?Sized,
    {
        source.reregister(self, token, interests)
    }

    /// Removes a source from the selector.
    ///
    /// No further event for the source is delivered by any subsequent
    /// wait. Deregister a source before closing it: once the
    /// descriptor is closed the kernel drops the registration on its
    /// own, and the integer may be reused by an unrelated descriptor.
    pub fn deregister<S>(&self, source: &mut S) -> Result<()>
    where
        S: Source + ?Sized,
    {
        source.deregister(self)
    }

    /// Returns an independently owned `Registry` over the same
    /// registration table.
    ///
    /// The underlying selector descriptor is duplicated; sources
    /// registered through either handle produce events on the
    /// original `Poll`.
    pub fn try_clone(&self) -> Result<Registry> {
        let selector = self.selector.try_clone()?;
        Ok(Registry { selector })
    }
}

/// Returns the selector backing a registry.
///
/// Used by `SourceFd` to reach the registration table; sources
/// themselves never see the selector type.
pub(crate) fn selector(registry: &Registry) -> &sys::Selector {
    &registry.selector
}
