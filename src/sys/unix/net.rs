//! Socket creation and `std::net::SocketAddr` conversion.

use std::mem;
use std::net::{SocketAddr, SocketAddrV4, SocketAddrV6};
use std::os::unix::io::RawFd;

use crate::sys::unix::cvt;
use crate::{Error, Result};

/// Creates a socket that is non-blocking and close-on-exec from the
/// start.
pub(crate) fn new_socket(domain: libc::c_int, socket_type: libc::c_int) -> Result<RawFd> {
    cvt(unsafe {
        libc::socket(
            domain,
            socket_type | libc::SOCK_NONBLOCK | libc::SOCK_CLOEXEC,
            0,
        )
    })
}

pub(crate) fn domain_of(addr: &SocketAddr) -> libc::c_int {
    match addr {
        SocketAddr::V4(..) => libc::AF_INET,
        SocketAddr::V6(..) => libc::AF_INET6,
    }
}

/// A `sockaddr` for either IP family, passable by pointer.
#[repr(C)]
pub(crate) union SocketAddrCRepr {
    v4: libc::sockaddr_in,
    v6: libc::sockaddr_in6,
}

impl SocketAddrCRepr {
    pub(crate) fn as_ptr(&self) -> *const libc::sockaddr {
        self as *const SocketAddrCRepr as *const libc::sockaddr
    }
}

/// Converts an address into its C representation plus length.
pub(crate) fn socket_addr(addr: &SocketAddr) -> (SocketAddrCRepr, libc::socklen_t) {
    match addr {
        SocketAddr::V4(ref addr) => {
            let sin_addr = libc::in_addr {
                s_addr: u32::from_ne_bytes(addr.ip().octets()),
            };

            let sockaddr_in = libc::sockaddr_in {
                sin_family: libc::AF_INET as libc::sa_family_t,
                sin_port: addr.port().to_be(),
                sin_addr,
                sin_zero: [0; 8],
            };

            (
                SocketAddrCRepr { v4: sockaddr_in },
                mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
            )
        }
        SocketAddr::V6(ref addr) => {
            let sockaddr_in6 = libc::sockaddr_in6 {
                sin6_family: libc::AF_INET6 as libc::sa_family_t,
                sin6_port: addr.port().to_be(),
                sin6_addr: libc::in6_addr {
                    s6_addr: addr.ip().octets(),
                },
                sin6_flowinfo: addr.flowinfo(),
                sin6_scope_id: addr.scope_id(),
            };

            (
                SocketAddrCRepr { v6: sockaddr_in6 },
                mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t,
            )
        }
    }
}

/// Decodes a kernel-filled `sockaddr_storage` back into an address.
pub(crate) fn to_socket_addr(storage: &libc::sockaddr_storage) -> Result<SocketAddr> {
    match storage.ss_family as libc::c_int {
        libc::AF_INET => {
            let addr = unsafe { *(storage as *const _ as *const libc::sockaddr_in) };
            let ip = addr.sin_addr.s_addr.to_ne_bytes().into();
            Ok(SocketAddr::V4(SocketAddrV4::new(
                ip,
                u16::from_be(addr.sin_port),
            )))
        }
        libc::AF_INET6 => {
            let addr = unsafe { *(storage as *const _ as *const libc::sockaddr_in6) };
            let ip = addr.sin6_addr.s6_addr.into();
            Ok(SocketAddr::V6(SocketAddrV6::new(
                ip,
                u16::from_be(addr.sin6_port),
                addr.sin6_flowinfo,
                addr.sin6_scope_id,
            )))
        }
        _ => Err(Error::from_raw_os_error(libc::EINVAL)),
    }
}

pub(crate) fn local_addr(fd: RawFd) -> Result<SocketAddr> {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

    cvt(unsafe {
        libc::getsockname(fd, &mut storage as *mut _ as *mut libc::sockaddr, &mut len)
    })?;
    to_socket_addr(&storage)
}

pub(crate) fn peer_addr(fd: RawFd) -> Result<SocketAddr> {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

    cvt(unsafe {
        libc::getpeername(fd, &mut storage as *mut _ as *mut libc::sockaddr, &mut len)
    })?;
    to_socket_addr(&storage)
}

pub(crate) fn setsockopt<T>(
    fd: RawFd,
    level: libc::c_int,
    opt: libc::c_int,
    val: T,
) -> Result<()> {
    cvt(unsafe {
        libc::setsockopt(
            fd,
            level,
            opt,
            &val as *const T as *const libc::c_void,
            mem::size_of::<T>() as libc::socklen_t,
        )
    })
    .map(|_| ())
}

pub(crate) fn getsockopt<T: Copy>(fd: RawFd, level: libc::c_int, opt: libc::c_int) -> Result<T> {
    let mut val: T = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<T>() as libc::socklen_t;

    cvt(unsafe {
        libc::getsockopt(
            fd,
            level,
            opt,
            &mut val as *mut T as *mut libc::c_void,
            &mut len,
        )
    })?;
    Ok(val)
}

/// Reads and clears the pending socket error.
pub(crate) fn take_error(fd: RawFd) -> Result<Option<Error>> {
    let err: libc::c_int = getsockopt(fd, libc::SOL_SOCKET, libc::SO_ERROR)?;
    if err == 0 {
        Ok(None)
    } else {
        Ok(Some(Error::from_raw_os_error(err)))
    }
}

pub(crate) fn shutdown(fd: RawFd, how: std::net::Shutdown) -> Result<()> {
    let how = match how {
        std::net::Shutdown::Read => libc::SHUT_RD,
        std::net::Shutdown::Write => libc::SHUT_WR,
        std::net::Shutdown::Both => libc::SHUT_RDWR,
    };

    cvt(unsafe { libc::shutdown(fd, how) }).map(|_| ())
}
