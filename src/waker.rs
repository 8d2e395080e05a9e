use std::sync::Arc;

use crate::unix::SourceFd;
use crate::{Interest, Registry, Result, Token};

use crate::sys;

/// Wakes a [`Poll`] instance from any thread.
///
/// A `Waker` is a synthetic readable source backed by a kernel
/// counter. Constructing one registers it with the supplied registry
/// under the supplied token; calling [`wake`] from any thread then
/// causes the next (or current) [`Poll::poll`] to return with a
/// readable event carrying that token.
///
/// Any number of wakes between two waits coalesce into a single
/// event. After handling the event, call [`drain`] from the polling
/// thread to rearm the edge for subsequent wakes.
///
/// `Waker` is cheaply clonable; all clones share one underlying
/// counter and one registration identity, and the counter is closed
/// when the last clone is dropped.
///
/// # Examples
///
/// Waking a blocked poll from a worker thread:
///
/// ```
/// use std::thread;
/// use std::time::Duration;
/// use edge_net::{Events, Poll, Token, Waker};
///
/// const WAKE: Token = Token(0xFFFF);
///
/// let mut poll = Poll::new()?;
/// let waker = Waker::new(poll.registry(), WAKE)?;
///
/// let handle = waker.clone();
/// let worker = thread::spawn(move || {
///     thread::sleep(Duration::from_millis(20));
///     handle.wake().expect("wake failed");
/// });
///
/// let mut events = Events::with_capacity(8);
/// poll.poll(&mut events, Some(Duration::from_secs(2)))?;
///
/// assert!(events
///     .iter()
///     .any(|event| event.token() == WAKE && event.is_readable()));
///
/// waker.drain();
/// worker.join().unwrap();
/// # edge_net::Result::Ok(())
/// ```
///
/// [`Poll`]: struct.Poll.html
/// [`Poll::poll`]: struct.Poll.html#method.poll
/// [`wake`]: #method.wake
/// [`drain`]: #method.drain
#[derive(Clone, Debug)]
pub struct Waker {
    inner: Arc<sys::Waker>,
}

impl Waker {
    /// Returns a new `Waker`, registered with `registry` under
    /// `token` with readable interest.
    pub fn new(registry: &Registry, token: Token) -> Result<Waker> {
        let inner = sys::Waker::new()?;
        let fd = inner.raw();
        registry.register(&mut SourceFd(&fd), token, Interest::READABLE)?;

        Ok(Waker {
            inner: Arc::new(inner),
        })
    }

    /// Causes the associated poll to return promptly.
    ///
    /// Safe to call from any thread, any number of times,
    /// concurrently with itself and with the waiter. If the
    /// underlying counter is saturated the wake is already pending
    /// and the call succeeds; any other failure is returned.
    pub fn wake(&self) -> Result<()> {
        self.inner.wake()
    }

    /// Consumes pending wakes so the next [`wake`] produces a fresh
    /// readiness edge.
    ///
    /// Intended to be called by the polling thread after it observes
    /// the waker's event. Errors are swallowed; draining is best
    /// effort.
    ///
    /// [`wake`]: #method.wake
    pub fn drain(&self) {
        self.inner.drain()
    }
}
