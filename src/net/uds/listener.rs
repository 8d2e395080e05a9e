use std::fmt;
use std::mem;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};
use std::path::Path;

use crate::net::uds::SocketAddr;
use crate::net::UnixStream;
use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::{cvt, uds};
use crate::unix::SourceFd;
use crate::{Error, Interest, Registry, Result, Source, Token};

/// A Unix-domain socket server, listening for connections.
pub struct UnixListener {
    fd: FdGuard,
}

impl UnixListener {
    /// Binds a new listener to the given filesystem path and starts
    /// listening.
    ///
    /// The path must not exist; it is created by the bind and is not
    /// removed when the listener is dropped.
    pub fn bind<P: AsRef<Path>>(path: P) -> Result<UnixListener> {
        let (sockaddr, socklen) = uds::socket_addr(path.as_ref())?;
        UnixListener::bind_addr(&SocketAddr::from_parts(sockaddr, socklen))
    }

    /// Binds a new listener to the given address.
    pub fn bind_addr(addr: &SocketAddr) -> Result<UnixListener> {
        let fd = uds::bind(libc::SOCK_STREAM, addr)?;
        cvt(unsafe { libc::listen(fd.raw(), libc::SOMAXCONN) })?;

        Ok(UnixListener { fd })
    }

    /// Accepts a pending connection, returning the stream and the
    /// peer address.
    ///
    /// Peers that did not bind their socket report an unnamed
    /// address. The returned stream is non-blocking and
    /// close-on-exec.
    pub fn accept(&self) -> Result<(UnixStream, SocketAddr)> {
        let mut sockaddr: libc::sockaddr_un = unsafe { mem::zeroed() };
        let mut socklen = mem::size_of::<libc::sockaddr_un>() as libc::socklen_t;

        let fd = cvt(unsafe {
            libc::accept4(
                self.fd.raw(),
                &mut sockaddr as *mut _ as *mut libc::sockaddr,
                &mut socklen,
                libc::SOCK_NONBLOCK | libc::SOCK_CLOEXEC,
            )
        })?;

        let stream = UnixStream::from_fd(FdGuard::new(fd));
        Ok((stream, SocketAddr::from_parts(sockaddr, socklen)))
    }

    /// Returns the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        uds::local_addr(self.fd.raw())
    }

    /// Returns and clears the pending error on this socket, if any.
    pub fn take_error(&self) -> Result<Option<Error>> {
        crate::sys::unix::net::take_error(self.fd.raw())
    }
}

impl Source for UnixListener {
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

impl AsRawFd for UnixListener {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.raw()
    }
}

impl FromRawFd for UnixListener {
    unsafe fn from_raw_fd(fd: RawFd) -> UnixListener {
        UnixListener { fd: FdGuard::new(fd) }
    }
}

impl IntoRawFd for UnixListener {
    fn into_raw_fd(mut self) -> RawFd {
        self.fd.release()
    }
}

impl fmt::Debug for UnixListener {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("UnixListener").field("fd", &self.fd).finish()
    }
}
