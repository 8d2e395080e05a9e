//! A non-blocking, unidirectional pipe.
//!
//! Created in one atomic step with both ends non-blocking and
//! close-on-exec.
//!
//! # Examples
//!
//! Reading the end-of-file condition after the sender is dropped:
//!
//! ```
//! use std::time::Duration;
//! use edge_net::unix::pipe;
//! use edge_net::{Events, Interest, Poll, Token};
//!
//! let mut poll = Poll::new()?;
//! let mut events = Events::with_capacity(8);
//!
//! let (sender, mut receiver) = pipe::new()?;
//! poll.registry()
//!     .register(&mut receiver, Token(2), Interest::READABLE)?;
//!
//! drop(sender);
//! poll.poll(&mut events, Some(Duration::from_millis(100)))?;
//!
//! let event = events.iter().next().unwrap();
//! assert_eq!(event.token(), Token(2));
//!
//! let mut buf = [0; 8];
//! assert_eq!(receiver.read(&mut buf)?, 0);
//! # edge_net::Result::Ok(())
//! ```

use std::fmt;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};

use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::{cvt, set_nonblocking};
use crate::unix::SourceFd;
use crate::{Interest, Registry, Result, Source, Token};

/// Returns a connected pipe as a (sender, receiver) pair.
pub fn new() -> Result<(Sender, Receiver)> {
    let mut fds = [-1; 2];
    cvt(unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_NONBLOCK | libc::O_CLOEXEC) })?;

    Ok((
        Sender { fd: FdGuard::new(fds[1]) },
        Receiver { fd: FdGuard::new(fds[0]) },
    ))
}

/// The writing end of a pipe.
///
/// Dropping the last sender makes the receiving end readable with a
/// zero-byte read.
pub struct Sender {
    fd: FdGuard,
}

impl Sender {
    /// Writes bytes into the pipe, returning how many were written.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let n = cvt(unsafe {
            libc::write(
                self.fd.raw(),
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
            )
        })?;
        Ok(n as usize)
    }

    /// Switches the sender between non-blocking and blocking mode.
    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        set_nonblocking(self.fd.raw(), nonblocking)
    }
}

/// The reading end of a pipe.
pub struct Receiver {
    fd: FdGuard,
}

impl Receiver {
    /// Reads bytes from the pipe, returning how many were read.
    ///
    /// `Ok(0)` means every sender has been dropped and the pipe is
    /// drained.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let n = cvt(unsafe {
            libc::read(
                self.fd.raw(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
            )
        })?;
        Ok(n as usize)
    }

    /// Switches the receiver between non-blocking and blocking mode.
    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        set_nonblocking(self.fd.raw(), nonblocking)
    }
}

impl Source for Sender {
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        SourceFd(&self.fd.raw()).register(registry, token, interests)
    }

    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        SourceFd(&self.fd.raw()).reregister(registry, token, interests)
    }

    fn deregister(&mut self, registry: &Registry) -> Result<()> {
        SourceFd(&self.fd.raw()).deregister(registry)
    }
}

impl Source for Receiver {
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        SourceFd(&self.fd.raw()).register(registry, token, interests)
    }

    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        SourceFd(&self.fd.raw()).reregister(registry, token, interests)
    }

    fn deregister(&mut self, registry: &Registry) -> Result<()> {
        SourceFd(&self.fd.raw()).deregister(registry)
    }
}

impl AsRawFd for Sender {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.raw()
    }
}

impl FromRawFd for Sender {
    unsafe fn from_raw_fd(fd: RawFd) -> Sender {
        Sender { fd: FdGuard::new(fd) }
    }
}

impl IntoRawFd for Sender {
    fn into_raw_fd(mut self) -> RawFd {
        self.fd.release()
    }
}

impl AsRawFd for Receiver {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.raw()
    }
}

impl FromRawFd for Receiver {
    unsafe fn from_raw_fd(fd: RawFd) -> Receiver {
        Receiver { fd: FdGuard::new(fd) }
    }
}

impl IntoRawFd for Receiver {
    fn into_raw_fd(mut self) -> RawFd {
        self.fd.release()
    }
}

impl fmt::Debug for Sender {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Sender").field("fd", &self.fd).finish()
    }
}

impl fmt::Debug for Receiver {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Receiver").field("fd", &self.fd).finish()
    }
}
