use std::fmt;
use std::mem;
use std::net::Shutdown;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};
use std::path::Path;

use crate::net::uds::SocketAddr;
use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::{cvt, net as sys, uds};
use crate::unix::SourceFd;
use crate::{Error, Interest, Registry, Result, Source, Token};

/// A non-blocking Unix-domain datagram socket.
pub struct UnixDatagram {
    fd: FdGuard,
}

impl UnixDatagram {
    /// Binds a new socket to the given filesystem path.
    pub fn bind<P: AsRef<Path>>(path: P) -> Result<UnixDatagram> {
        let (sockaddr, socklen) = uds::socket_addr(path.as_ref())?;
        UnixDatagram::bind_addr(&SocketAddr::from_parts(sockaddr, socklen))
    }

    /// Binds a new socket to the given address.
    pub fn bind_addr(addr: &SocketAddr) -> Result<UnixDatagram> {
        let fd = uds::bind(libc::SOCK_DGRAM, addr)?;
        Ok(UnixDatagram { fd })
    }

    /// Returns a socket bound to no address.
    ///
    /// An unbound socket can send to named peers and receive on a
    /// connected pair, but peers cannot address it.
    pub fn unbound() -> Result<UnixDatagram> {
        let fd = sys::new_socket(libc::AF_UNIX, libc::SOCK_DGRAM)?;
        Ok(UnixDatagram { fd: FdGuard::new(fd) })
    }

    /// Returns a pair of connected, anonymous datagram sockets.
    pub fn pair() -> Result<(UnixDatagram, UnixDatagram)> {
        let (a, b) = uds::pair(libc::SOCK_DGRAM)?;
        Ok((UnixDatagram { fd: a }, UnixDatagram { fd: b }))
    }

    /// Sets the default destination for sends and filters received
    /// datagrams to that peer.
    pub fn connect<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let (sockaddr, socklen) = uds::socket_addr(path.as_ref())?;
        self.connect_addr(&SocketAddr::from_parts(sockaddr, socklen))
    }

    /// Connects to the peer at the given address.
    pub fn connect_addr(&self, addr: &SocketAddr) -> Result<()> {
        let (sockaddr, socklen) = addr.as_raw();
        cvt(unsafe { libc::connect(self.fd.raw(), sockaddr, socklen) }).map(|_| ())
    }

    /// Sends a datagram to the peer at the given path.
    pub fn send_to<P: AsRef<Path>>(&self, buf: &[u8], path: P) -> Result<usize> {
        let (sockaddr, socklen) = uds::socket_addr(path.as_ref())?;
        self.send_to_addr(buf, &SocketAddr::from_parts(sockaddr, socklen))
    }

    /// Sends a datagram to the peer at the given address.
    pub fn send_to_addr(&self, buf: &[u8], addr: &SocketAddr) -> Result<usize> {
        let (sockaddr, socklen) = addr.as_raw();
        let n = cvt(unsafe {
            libc::sendto(
                self.fd.raw(),
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
                libc::MSG_NOSIGNAL,
                sockaddr,
                socklen,
            )
        })?;
        Ok(n as usize)
    }

    /// Receives a datagram, returning its length and sender address.
    pub fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        let mut sockaddr: libc::sockaddr_un = unsafe { mem::zeroed() };
        let mut socklen = mem::size_of::<libc::sockaddr_un>() as libc::socklen_t;

        let n = cvt(unsafe {
            libc::recvfrom(
                self.fd.raw(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                0,
                &mut sockaddr as *mut _ as *mut libc::sockaddr,
                &mut socklen,
            )
        })?;

        Ok((n as usize, SocketAddr::from_parts(sockaddr, socklen)))
    }

    /// Sends a datagram to the connected peer.
    pub fn send(&self, buf: &[u8]) -> Result<usize> {
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

    /// Receives a datagram from the connected peer.
    pub fn recv(&self, buf: &mut [u8]) -> Result<usize> {
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

    /// Shuts down the read, write, or both halves of this socket.
    pub fn shutdown(&self, how: Shutdown) -> Result<()> {
        sys::shutdown(self.fd.raw(), how)
    }

    /// Returns the local address this socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        uds::local_addr(self.fd.raw())
    }

    /// Returns the connected peer address.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        uds::peer_addr(self.fd.raw())
    }

    /// Returns and clears the pending error on this socket, if any.
    pub fn take_error(&self) -> Result<Option<Error>> {
        sys::take_error(self.fd.raw())
    }
}

impl Source for UnixDatagram {
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

impl AsRawFd for UnixDatagram {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.raw()
    }
}

impl FromRawFd for UnixDatagram {
    unsafe fn from_raw_fd(fd: RawFd) -> UnixDatagram {
        UnixDatagram { fd: FdGuard::new(fd) }
    }
}

impl IntoRawFd for UnixDatagram {
    fn into_raw_fd(mut self) -> RawFd {
        self.fd.release()
    }
}

impl fmt::Debug for UnixDatagram {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("UnixDatagram").field("fd", &self.fd).finish()
    }
}
