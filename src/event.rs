//! Readiness events and the reusable batch they are delivered in.

use std::fmt;

use crate::sys;
use crate::token::Token;

/// A readiness event returned by [`Poll::poll`].
///
/// `Event` is a read-only view over one platform readiness record: a
/// set of readiness indications paired with the [`Token`] supplied
/// when the source was registered.
///
/// The error and hang-up indications are delivered regardless of the
/// registered interest, so every consumer should be prepared to see
/// [`is_error`], [`is_read_closed`] and [`is_write_closed`] on any
/// source.
///
/// [`Poll::poll`]: struct.Poll.html#method.poll
/// [`Token`]: struct.Token.html
/// [`is_error`]: #method.is_error
/// [`is_read_closed`]: #method.is_read_closed
/// [`is_write_closed`]: #method.is_write_closed
#[repr(transparent)]
pub struct Event {
    inner: sys::RawEvent,
}

impl Event {
    /// Returns the token supplied when the source was registered.
    pub fn token(&self) -> Token {
        Token(self.inner.u64)
    }

    /// Returns true if the source transitioned to readable.
    pub fn is_readable(&self) -> bool {
        self.flags() & libc::EPOLLIN != 0
    }

    /// Returns true if the source transitioned to writable.
    pub fn is_writable(&self) -> bool {
        self.flags() & libc::EPOLLOUT != 0
    }

    /// Returns true if the source is in an error state.
    ///
    /// The next read or write on the source will surface the error.
    pub fn is_error(&self) -> bool {
        self.flags() & libc::EPOLLERR != 0
    }

    /// Returns true if reading can no longer produce new data.
    ///
    /// Set when the source hung up, or when the peer of a
    /// stream-oriented source closed its write half. Data already
    /// buffered may still be readable; drain until the zero-byte
    /// read.
    pub fn is_read_closed(&self) -> bool {
        self.flags() & (libc::EPOLLHUP | libc::EPOLLRDHUP) != 0
    }

    /// Returns true if writing can no longer succeed.
    ///
    /// Set when the source hung up or entered an error state.
    pub fn is_write_closed(&self) -> bool {
        self.flags() & (libc::EPOLLHUP | libc::EPOLLERR) != 0
    }

    /// Returns true if priority (out-of-band) data is ready.
    pub fn is_priority(&self) -> bool {
        self.flags() & libc::EPOLLPRI != 0
    }

    fn flags(&self) -> libc::c_int {
        self.inner.events as libc::c_int
    }

    pub(crate) fn from_sys_ref(sys: &sys::RawEvent) -> &Event {
        // Safe due to repr(transparent).
        unsafe { &*(sys as *const sys::RawEvent as *const Event) }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Event")
            .field("token", &self.token())
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("error", &self.is_error())
            .field("read_closed", &self.is_read_closed())
            .field("write_closed", &self.is_write_closed())
            .field("priority", &self.is_priority())
            .finish()
    }
}

/// A reusable batch of readiness events.
///
/// `Events` is a fixed-capacity buffer handed to [`Poll::poll`],
/// which clears it and then fills it with up to `capacity` records
/// returned by the kernel. Allocate one batch up front and reuse it
/// for the lifetime of the event loop; the wait path performs no
/// allocation of its own.
///
/// Iteration visits only the events produced by the most recent
/// wait, in no specified order.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use edge_net::{Events, Poll};
///
/// let mut poll = Poll::new()?;
/// let mut events = Events::with_capacity(1024);
///
/// // Nothing is registered, so a short wait returns an empty batch.
/// poll.poll(&mut events, Some(Duration::from_millis(10)))?;
///
/// assert!(events.is_empty());
/// # edge_net::Result::Ok(())
/// ```
///
/// [`Poll::poll`]: struct.Poll.html#method.poll
pub struct Events {
    inner: Vec<sys::RawEvent>,
}

impl Events {
    /// Returns a batch able to hold up to `capacity` events.
    pub fn with_capacity(capacity: usize) -> Events {
        Events {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Returns the maximum number of events the batch can hold.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Returns the number of events produced by the last wait.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the last wait produced no events.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the event at position `idx`, if any.
    pub fn get(&self, idx: usize) -> Option<&Event> {
        self.inner.get(idx).map(Event::from_sys_ref)
    }

    /// Discards all events in the batch.
    ///
    /// Called automatically at the start of every wait.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Returns an iterator over the events of the last wait.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.inner.iter(),
        }
    }

    pub(crate) fn sys_mut(&mut self) -> &mut Vec<sys::RawEvent> {
        &mut self.inner
    }
}

impl<'a> IntoIterator for &'a Events {
    type Item = &'a Event;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over the events of the most recent wait.
#[derive(Debug)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, sys::RawEvent>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Event::from_sys_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

#[cfg(test)]
mod test {
    use super::{Event, Events};
    use crate::sys;
    use crate::token::Token;

    fn raw(events: libc::c_int, token: u64) -> sys::RawEvent {
        sys::RawEvent {
            events: events as u32,
            u64: token,
        }
    }

    #[test]
    fn test_decodes_token_and_readiness() {
        let sys = raw(libc::EPOLLIN | libc::EPOLLOUT, 42);
        let event = Event::from_sys_ref(&sys);

        assert_eq!(event.token(), Token(42));
        assert!(event.is_readable());
        assert!(event.is_writable());
        assert!(!event.is_error());
        assert!(!event.is_priority());
    }

    #[test]
    fn test_read_closed_from_hup_or_rdhup() {
        for &flags in &[libc::EPOLLHUP, libc::EPOLLRDHUP] {
            let sys = raw(flags, 0);
            assert!(Event::from_sys_ref(&sys).is_read_closed());
        }

        let sys = raw(libc::EPOLLIN, 0);
        assert!(!Event::from_sys_ref(&sys).is_read_closed());
    }

    #[test]
    fn test_write_closed_from_hup_or_err() {
        for &flags in &[libc::EPOLLHUP, libc::EPOLLERR] {
            let sys = raw(flags, 0);
            assert!(Event::from_sys_ref(&sys).is_write_closed());
        }

        let sys = raw(libc::EPOLLRDHUP, 0);
        assert!(!Event::from_sys_ref(&sys).is_write_closed());
    }

    #[test]
    fn test_batch_starts_empty() {
        let events = Events::with_capacity(8);

        assert!(events.capacity() >= 8);
        assert_eq!(events.len(), 0);
        assert!(events.is_empty());
        assert!(events.get(0).is_none());
        assert_eq!(events.iter().count(), 0);
    }
}
