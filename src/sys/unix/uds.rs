//! Unix-domain socket helpers: `sockaddr_un` construction, socket
//! pairs and name lookups.

use std::mem;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

use crate::net::SocketAddr;
use crate::sys::unix::cvt;
use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::net::new_socket;
use crate::{Error, Result};

pub(crate) fn sun_path_offset(sockaddr: &libc::sockaddr_un) -> usize {
    let base = sockaddr as *const libc::sockaddr_un as usize;
    let path = &sockaddr.sun_path as *const libc::c_char as usize;
    path - base
}

/// Builds a pathname `sockaddr_un` from a filesystem path.
///
/// Paths that do not fit `sun_path` (including the terminating NUL)
/// are rejected rather than truncated.
pub(crate) fn socket_addr(path: &Path) -> Result<(libc::sockaddr_un, libc::socklen_t)> {
    let mut sockaddr: libc::sockaddr_un = unsafe { mem::zeroed() };
    sockaddr.sun_family = libc::AF_UNIX as libc::sa_family_t;

    let bytes = path.as_os_str().as_bytes();
    if bytes.len() >= sockaddr.sun_path.len() {
        return Err(Error::from_raw_os_error(libc::ENAMETOOLONG));
    }

    for (dst, src) in sockaddr.sun_path.iter_mut().zip(bytes.iter()) {
        *dst = *src as libc::c_char;
    }

    let socklen = sun_path_offset(&sockaddr) + bytes.len() + 1;
    Ok((sockaddr, socklen as libc::socklen_t))
}

pub(crate) fn bind(socket_type: libc::c_int, addr: &SocketAddr) -> Result<FdGuard> {
    let fd = new_socket(libc::AF_UNIX, socket_type)?;
    let guard = FdGuard::new(fd);

    let (sockaddr, socklen) = addr.as_raw();
    cvt(unsafe { libc::bind(fd, sockaddr, socklen) })?;

    Ok(guard)
}

pub(crate) fn pair(socket_type: libc::c_int) -> Result<(FdGuard, FdGuard)> {
    let mut fds = [-1; 2];
    cvt(unsafe {
        libc::socketpair(
            libc::AF_UNIX,
            socket_type | libc::SOCK_NONBLOCK | libc::SOCK_CLOEXEC,
            0,
            fds.as_mut_ptr(),
        )
    })?;

    Ok((FdGuard::new(fds[0]), FdGuard::new(fds[1])))
}

pub(crate) fn local_addr(fd: RawFd) -> Result<SocketAddr> {
    let mut sockaddr: libc::sockaddr_un = unsafe { mem::zeroed() };
    let mut socklen = mem::size_of::<libc::sockaddr_un>() as libc::socklen_t;

    cvt(unsafe {
        libc::getsockname(
            fd,
            &mut sockaddr as *mut _ as *mut libc::sockaddr,
            &mut socklen,
        )
    })?;
    Ok(SocketAddr::from_parts(sockaddr, socklen))
}

pub(crate) fn peer_addr(fd: RawFd) -> Result<SocketAddr> {
    let mut sockaddr: libc::sockaddr_un = unsafe { mem::zeroed() };
    let mut socklen = mem::size_of::<libc::sockaddr_un>() as libc::socklen_t;

    cvt(unsafe {
        libc::getpeername(
            fd,
            &mut sockaddr as *mut _ as *mut libc::sockaddr,
            &mut socklen,
        )
    })?;
    Ok(SocketAddr::from_parts(sockaddr, socklen))
}

#[cfg(test)]
mod test {
    use super::{socket_addr, sun_path_offset};
    use std::mem;
    use std::path::Path;

    #[test]
    fn test_pathname_layout() {
        let (sockaddr, socklen) = socket_addr(Path::new("/tmp/sock")).unwrap();

        assert_eq!(sockaddr.sun_family, libc::AF_UNIX as libc::sa_family_t);
        assert_eq!(
            socklen as usize,
            sun_path_offset(&sockaddr) + "/tmp/sock".len() + 1
        );
        assert_eq!(sockaddr.sun_path["/tmp/sock".len()], 0);
    }

    #[test]
    fn test_overlong_path_rejected() {
        let sockaddr: libc::sockaddr_un = unsafe { mem::zeroed() };
        let long = "x".repeat(sockaddr.sun_path.len());

        let err = socket_addr(Path::new(&long)).unwrap_err();
        assert_eq!(err.raw_os_error(), libc::ENAMETOOLONG);
    }
}
