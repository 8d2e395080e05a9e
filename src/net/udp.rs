use std::fmt;
use std::mem;
use std::net::SocketAddr;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};

use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::{cvt, net as sys};
use crate::unix::SourceFd;
use crate::{Error, Interest, Registry, Result, Source, Token};

/// A non-blocking UDP socket.
///
/// # Examples
///
/// A round-trip over two loopback sockets:
///
/// ```
/// use edge_net::net::UdpSocket;
///
/// let alice = UdpSocket::bind("127.0.0.1:0".parse().unwrap())?;
/// let bob = UdpSocket::bind("127.0.0.1:0".parse().unwrap())?;
///
/// alice.send_to(b"ping", bob.local_addr()?)?;
///
/// let mut buf = [0; 16];
/// std::thread::sleep(std::time::Duration::from_millis(10));
/// let (len, from) = bob.recv_from(&mut buf)?;
///
/// assert_eq!(&buf[..len], b"ping");
/// assert_eq!(from, alice.local_addr()?);
/// # edge_net::Result::Ok(())
/// ```
pub struct UdpSocket {
    fd: FdGuard,
}

impl UdpSocket {
    /// Binds a new socket to the given address.
    pub fn bind(addr: SocketAddr) -> Result<UdpSocket> {
        let fd = sys::new_socket(sys::domain_of(&addr), libc::SOCK_DGRAM)?;
        let socket = UdpSocket { fd: FdGuard::new(fd) };

        let (sockaddr, socklen) = sys::socket_addr(&addr);
        cvt(unsafe { libc::bind(fd, sockaddr.as_ptr(), socklen) })?;

        Ok(socket)
    }

    /// Sets the default destination and filters received datagrams
    /// to that peer.
    pub fn connect(&self, addr: SocketAddr) -> Result<()> {
        let (sockaddr, socklen) = sys::socket_addr(&addr);
        cvt(unsafe { libc::connect(self.fd.raw(), sockaddr.as_ptr(), socklen) }).map(|_| ())
    }

    /// Sends a datagram to the given address.
    pub fn send_to(&self, buf: &[u8], target: SocketAddr) -> Result<usize> {
        let (sockaddr, socklen) = sys::socket_addr(&target);
        let n = cvt(unsafe {
            libc::sendto(
                self.fd.raw(),
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
                libc::MSG_NOSIGNAL,
                sockaddr.as_ptr(),
                socklen,
            )
        })?;
        Ok(n as usize)
    }

    /// Receives a datagram, returning its length and sender.
    pub fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        self.recv_from_flags(buf, 0)
    }

    /// Receives a datagram without consuming it.
    pub fn peek_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        self.recv_from_flags(buf, libc::MSG_PEEK)
    }

    fn recv_from_flags(
        &self,
        buf: &mut [u8],
        flags: libc::c_int,
    ) -> Result<(usize, SocketAddr)> {
        let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
        let mut socklen = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

        let n = cvt(unsafe {
            libc::recvfrom(
                self.fd.raw(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                flags,
                &mut storage as *mut _ as *mut libc::sockaddr,
                &mut socklen,
            )
        })?;

        let sender = sys::to_socket_addr(&storage)?;
        Ok((n as usize, sender))
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

    /// Receives a datagram from the connected peer without consuming
    /// it.
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

    /// Returns the local address this socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        sys::local_addr(self.fd.raw())
    }

    /// Returns the connected peer address.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        sys::peer_addr(self.fd.raw())
    }

    /// Sets the `SO_BROADCAST` option for this socket.
    pub fn set_broadcast(&self, on: bool) -> Result<()> {
        sys::setsockopt(
            self.fd.raw(),
            libc::SOL_SOCKET,
            libc::SO_BROADCAST,
            on as libc::c_int,
        )
    }

    /// Gets the `SO_BROADCAST` option for this socket.
    pub fn broadcast(&self) -> Result<bool> {
        let val: libc::c_int =
            sys::getsockopt(self.fd.raw(), libc::SOL_SOCKET, libc::SO_BROADCAST)?;
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

    /// Gets the `IPV6_V6ONLY` option for this socket.
    pub fn only_v6(&self) -> Result<bool> {
        let val: libc::c_int =
            sys::getsockopt(self.fd.raw(), libc::IPPROTO_IPV6, libc::IPV6_V6ONLY)?;
        Ok(val != 0)
    }

    /// Returns and clears the pending error on this socket, if any.
    pub fn take_error(&self) -> Result<Option<Error>> {
        sys::take_error(self.fd.raw())
    }
}

impl Source for UdpSocket {
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

impl AsRawFd for UdpSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.raw()
    }
}

impl FromRawFd for UdpSocket {
    unsafe fn from_raw_fd(fd: RawFd) -> UdpSocket {
        UdpSocket { fd: FdGuard::new(fd) }
    }
}

impl IntoRawFd for UdpSocket {
    fn into_raw_fd(mut self) -> RawFd {
        self.fd.release()
    }
}

impl fmt::Debug for UdpSocket {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("UdpSocket").field("fd", &self.fd).finish()
    }
}
