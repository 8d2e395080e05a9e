use std::fmt;
use std::net::Shutdown;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};
use std::path::Path;

use iovec::IoVec;

use crate::net::uds::{SocketAddr, UCred};
use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::{cvt, net as sys, uds, VecIo};
use crate::unix::SourceFd;
use crate::{Error, Interest, Registry, Result, Source, Token};

/// A non-blocking Unix-domain stream connection.
///
/// The stream side mirrors [`TcpStream`]: asynchronous connect with
/// the in-progress indication tolerated, zero-byte reads for peer
/// write-half close, and would-block errors marking the end of a
/// drain.
///
/// [`TcpStream`]: struct.TcpStream.html
pub struct UnixStream {
    fd: FdGuard,
}

impl UnixStream {
    /// Begins connecting to the listener at the given path.
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<UnixStream> {
        let (sockaddr, socklen) = uds::socket_addr(path.as_ref())?;
        UnixStream::connect_addr(&SocketAddr::from_parts(sockaddr, socklen))
    }

    /// Begins connecting to the listener at the given address.
    pub fn connect_addr(addr: &SocketAddr) -> Result<UnixStream> {
        let fd = sys::new_socket(libc::AF_UNIX, libc::SOCK_STREAM)?;
        let stream = UnixStream { fd: FdGuard::new(fd) };

        let (sockaddr, socklen) = addr.as_raw();
        match cvt(unsafe { libc::connect(fd, sockaddr, socklen) }) {
            Ok(_) => {}
            Err(ref e) if e.is_in_progress() => {}
            Err(e) => return Err(e),
        }

        Ok(stream)
    }

    /// Returns a pair of connected, anonymous streams.
    pub fn pair() -> Result<(UnixStream, UnixStream)> {
        let (a, b) = uds::pair(libc::SOCK_STREAM)?;
        Ok((UnixStream { fd: a }, UnixStream { fd: b }))
    }

    pub(crate) fn from_fd(fd: FdGuard) -> UnixStream {
        UnixStream { fd }
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

    /// Shuts down the read, write, or both halves of this stream.
    pub fn shutdown(&self, how: Shutdown) -> Result<()> {
        sys::shutdown(self.fd.raw(), how)
    }

    /// Returns the address of the remote peer.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        uds::peer_addr(self.fd.raw())
    }

    /// Returns the local address of this stream.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        uds::local_addr(self.fd.raw())
    }

    /// Returns the credentials of the peer process.
    pub fn peer_cred(&self) -> Result<UCred> {
        super::ucred::peer_cred(self.fd.raw())
    }

    /// Returns and clears the pending error on this socket, if any.
    pub fn take_error(&self) -> Result<Option<Error>> {
        sys::take_error(self.fd.raw())
    }
}

impl Source for UnixStream {
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

impl AsRawFd for UnixStream {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.raw()
    }
}

impl FromRawFd for UnixStream {
    unsafe fn from_raw_fd(fd: RawFd) -> UnixStream {
        UnixStream { fd: FdGuard::new(fd) }
    }
}

impl IntoRawFd for UnixStream {
    fn into_raw_fd(mut self) -> RawFd {
        self.fd.release()
    }
}

impl fmt::Debug for UnixStream {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("UnixStream").field("fd", &self.fd).finish()
    }
}
