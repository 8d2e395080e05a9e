use std::fmt;
use std::mem;
use std::net::SocketAddr;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};

use crate::net::TcpStream;
use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::{cvt, net as sys};
use crate::unix::SourceFd;
use crate::{Error, Interest, Registry, Result, Source, Token};

/// A TCP socket server, listening for connections.
///
/// The listener is non-blocking: with no pending connection,
/// [`accept`] fails with a would-block error. Register it readable
/// and accept in a loop on every event until the queue is drained.
///
/// # Examples
///
/// ```
/// use edge_net::net::TcpListener;
/// use edge_net::{Interest, Poll, Token};
///
/// let mut listener = TcpListener::bind("127.0.0.1:0".parse().unwrap())?;
///
/// let mut poll = Poll::new()?;
/// poll.registry()
///     .register(&mut listener, Token(0), Interest::READABLE)?;
///
/// // Nobody is connecting yet.
/// assert!(listener.accept().unwrap_err().is_would_block());
/// # edge_net::Result::Ok(())
/// ```
///
/// [`accept`]: #method.accept
pub struct TcpListener {
    fd: FdGuard,
}

impl TcpListener {
    /// Binds a new listener to the given address and starts
    /// listening.
    ///
    /// `SO_REUSEADDR` is set before binding, matching the common
    /// server restart pattern. A port of 0 asks the OS to choose one;
    /// the assignment is visible through [`local_addr`].
    ///
    /// [`local_addr`]: #method.local_addr
    pub fn bind(addr: SocketAddr) -> Result<TcpListener> {
        let fd = sys::new_socket(sys::domain_of(&addr), libc::SOCK_STREAM)?;
        let listener = TcpListener { fd: FdGuard::new(fd) };

        sys::setsockopt(fd, libc::SOL_SOCKET, libc::SO_REUSEADDR, 1 as libc::c_int)?;

        let (sockaddr, socklen) = sys::socket_addr(&addr);
        cvt(unsafe { libc::bind(fd, sockaddr.as_ptr(), socklen) })?;
        cvt(unsafe { libc::listen(fd, libc::SOMAXCONN) })?;

        Ok(listener)
    }

    /// Accepts a pending connection, returning the stream and the
    /// peer address.
    ///
    /// The returned stream is itself non-blocking and close-on-exec.
    /// With no pending connection the call fails with a would-block
    /// error.
    pub fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
        let mut socklen = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

        let fd = cvt(unsafe {
            libc::accept4(
                self.fd.raw(),
                &mut storage as *mut _ as *mut libc::sockaddr,
                &mut socklen,
                libc::SOCK_NONBLOCK | libc::SOCK_CLOEXEC,
            )
        })?;
        let stream = TcpStream::from_fd(FdGuard::new(fd));

        let peer = sys::to_socket_addr(&storage)?;
        Ok((stream, peer))
    }

    /// Returns the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        sys::local_addr(self.fd.raw())
    }

    /// Sets the `SO_REUSEADDR` option for this socket.
    ///
    /// Already enabled by [`bind`].
    ///
    /// [`bind`]: #method.bind
    pub fn set_reuseaddr(&self, reuseaddr: bool) -> Result<()> {
        sys::setsockopt(
            self.fd.raw(),
            libc::SOL_SOCKET,
            libc::SO_REUSEADDR,
            reuseaddr as libc::c_int,
        )
    }

    /// Sets the `SO_REUSEPORT` option for this socket.
    ///
    /// Lets multiple listeners bind the same address, with the
    /// kernel balancing incoming connections between them.
    pub fn set_reuseport(&self, reuseport: bool) -> Result<()> {
        sys::setsockopt(
            self.fd.raw(),
            libc::SOL_SOCKET,
            libc::SO_REUSEPORT,
            reuseport as libc::c_int,
        )
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

    /// Returns and clears the pending error on this socket, if any.
    pub fn take_error(&self) -> Result<Option<Error>> {
        sys::take_error(self.fd.raw())
    }
}

impl Source for TcpListener {
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

impl AsRawFd for TcpListener {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.raw()
    }
}

impl FromRawFd for TcpListener {
    unsafe fn from_raw_fd(fd: RawFd) -> TcpListener {
        TcpListener { fd: FdGuard::new(fd) }
    }
}

impl IntoRawFd for TcpListener {
    fn into_raw_fd(mut self) -> RawFd {
        self.fd.release()
    }
}

impl fmt::Debug for TcpListener {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("TcpListener").field("fd", &self.fd).finish()
    }
}
