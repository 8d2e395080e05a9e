use std::fmt;
use std::net::{Shutdown, SocketAddr};
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};

use iovec::IoVec;

use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::{cvt, net as sys, VecIo};
use crate::unix::SourceFd;
use crate::{Error, Interest, Registry, Result, Source, Token};

/// A non-blocking TCP connection.
///
/// Obtained either from [`TcpListener::accept`] or from [`connect`].
/// A connect is asynchronous: the call returns immediately and the
/// stream becomes writable once the connection is established (or
/// enters an error state if it fails — check [`take_error`] on a
/// writable-or-closed event after connecting).
///
/// A read of zero bytes means the peer closed its write half; it is
/// a successful read, distinct from the would-block error that
/// signals an empty receive buffer.
///
/// [`TcpListener::accept`]: struct.TcpListener.html#method.accept
/// [`connect`]: #method.connect
/// [`take_error`]: #method.take_error
pub struct TcpStream {
    fd: FdGuard,
}

impl TcpStream {
    /// Begins connecting to the given address.
    ///
    /// The in-progress indication of a non-blocking connect is not an
    /// error; any other failure is returned.
    pub fn connect(addr: SocketAddr) -> Result<TcpStream> {
        let fd = sys::new_socket(sys::domain_of(&addr), libc::SOCK_STREAM)?;
        let stream = TcpStream { fd: FdGuard::new(fd) };

        let (sockaddr, socklen) = sys::socket_addr(&addr);
        match cvt(unsafe { libc::connect(fd, sockaddr.as_ptr(), socklen) }) {
            Ok(_) => {}
            Err(ref e) if e.is_in_progress() => {}
            Err(e) => return Err(e),
        }

        Ok(stream)
    }

    pub(crate) fn from_fd(fd: FdGuard) -> TcpStream {
        TcpStream { fd }
    }

    /// Reads bytes into `buf`, returning how many were read.
    ///
    /// `Ok(0)` means the peer closed its write half.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let n = cvt(unsafe {
            libc::recv(
                self.fd.raw(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                0,
            )
        })?;
        Ok(n as usize)
    }

    /// Reads bytes into `buf` without consuming them.
    pub fn peek(&self, buf: &mut [u8]) -> Result<usize> {
        let n = cvt(unsafe {
            libc::recv(
                self.fd.raw(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                libc::MSG_PEEK,
            )
        })?;
        Ok(n as usize)
    }

    /// Writes bytes from `buf`, returning how many were written.
    ///
    /// A broken connection surfaces as an error value, never as a
    /// `SIGPIPE`.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let n = cvt(unsafe {
            libc::send(
                self.fd.raw(),
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
                libc::MSG_NOSIGNAL,
            )
        })?;
        Ok(n as usize)
    }

    /// Reads into multiple buffers at once.
    pub fn read_vectored(&self, bufs: &mut [&mut IoVec]) -> Result<usize> {
        self.readv(bufs)
    }

    /// Writes from multiple buffers at once.
    pub fn write_vectored(&self, bufs: &[&IoVec]) -> Result<usize> {
        self.writev(bufs)
    }

    /// Shuts down the read, write, or both halves of this connection.
    ///
    /// A write shutdown is visible to the peer as a zero-byte read
    /// once it drains its receive buffer.
    pub fn shutdown(&self, how: Shutdown) -> Result<()> {
        sys::shutdown(self.fd.raw(), how)
    }

    /// Sets the `TCP_NODELAY` option for this socket.
    pub fn set_nodelay(&self, nodelay: bool) -> Result<()> {
        sys::setsockopt(
            self.fd.raw(),
            libc::IPPROTO_TCP,
            libc::TCP_NODELAY,
            nodelay as libc::c_int,
        )
    }

    /// Gets the `TCP_NODELAY` option for this socket.
    pub fn nodelay(&self) -> Result<bool> {
        let val: libc::c_int =
            sys::getsockopt(self.fd.raw(), libc::IPPROTO_TCP, libc::TCP_NODELAY)?;
        Ok(val != 0)
    }

    /// Sets the `IP_TTL` option for this socket.
    pub fn set_ttl(&self, ttl: u32) -> Result<()> {
        sys::setsockopt(
            self.fd.raw(),
            libc::IPPROTO_IP,
            libc::IP_TTL,
            ttl as libc::c_int,
        )
    }

    /// Gets the `IP_TTL` option for this socket.
    pub fn ttl(&self) -> Result<u32> {
        let val: libc::c_int = sys::getsockopt(self.fd.raw(), libc::IPPROTO_IP, libc::IP_TTL)?;
        Ok(val as u32)
    }

    /// Returns the address of the remote peer.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        sys::peer_addr(self.fd.raw())
    }

    /// Returns the local address of this stream.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        sys::local_addr(self.fd.raw())
    }

    /// Returns and clears the pending error on this socket, if any.
    pub fn take_error(&self) -> Result<Option<Error>> {
        sys::take_error(self.fd.raw())
    }
}

impl Source for TcpStream {
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

impl AsRawFd for TcpStream {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.raw()
    }
}

impl FromRawFd for TcpStream {
    unsafe fn from_raw_fd(fd: RawFd) -> TcpStream {
        TcpStream { fd: FdGuard::new(fd) }
    }
}

impl IntoRawFd for TcpStream {
    fn into_raw_fd(mut self) -> RawFd {
        self.fd.release()
    }
}

impl fmt::Debug for TcpStream {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("TcpStream").field("fd", &self.fd).finish()
    }
}
