use std::ffi::OsStr;
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::sys::unix::uds::sun_path_offset;

/// The address of a Unix-domain socket.
///
/// Either a filesystem pathname or unnamed: a socket that was never
/// bound (or the anonymous end of a pair) has an address covering
/// only the family field.
///
/// # Examples
///
/// ```
/// use edge_net::net::UnixDatagram;
///
/// let socket = UnixDatagram::unbound()?;
/// let addr = socket.local_addr()?;
///
/// assert!(addr.is_unnamed());
/// assert_eq!(addr.as_pathname(), None);
/// # edge_net::Result::Ok(())
/// ```
pub struct SocketAddr {
    sockaddr: libc::sockaddr_un,
    socklen: libc::socklen_t,
}

impl SocketAddr {
    pub(crate) fn from_parts(
        sockaddr: libc::sockaddr_un,
        socklen: libc::socklen_t,
    ) -> SocketAddr {
        SocketAddr { sockaddr, socklen }
    }

    /// Returns true if the address is unnamed.
    pub fn is_unnamed(&self) -> bool {
        self.socklen as usize <= sun_path_offset(&self.sockaddr)
    }

    /// Returns the pathname of this address, if it has one.
    ///
    /// A trailing NUL stored by the kernel is not part of the path
    /// and is stripped.
    pub fn as_pathname(&self) -> Option<&Path> {
        if self.is_unnamed() {
            return None;
        }

        let len = self.socklen as usize - sun_path_offset(&self.sockaddr);
        let path = unsafe { &*(&self.sockaddr.sun_path[..len] as *const [libc::c_char] as *const [u8]) };

        let path = if path.last() == Some(&0) {
            &path[..len - 1]
        } else {
            path
        };

        Some(Path::new(OsStr::from_bytes(path)))
    }

    pub(crate) fn as_raw(&self) -> (*const libc::sockaddr, libc::socklen_t) {
        (
            &self.sockaddr as *const libc::sockaddr_un as *const libc::sockaddr,
            self.socklen,
        )
    }
}

impl fmt::Debug for SocketAddr {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_pathname() {
            Some(path) => write!(fmt, "{:?} (pathname)", path),
            None => write!(fmt, "(unnamed)"),
        }
    }
}
