use std::mem;
use std::os::unix::io::RawFd;

use crate::sys::unix::net::getsockopt;
use crate::Result;

/// Credentials of the process on the other end of a Unix-domain
/// stream.
///
/// Captured by the kernel at connect or pair time.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct UCred {
    /// PID of the peer process.
    pub pid: libc::pid_t,
    /// UID (user ID) of the peer process.
    pub uid: libc::uid_t,
    /// GID (group ID) of the peer process.
    pub gid: libc::gid_t,
}

pub(crate) fn peer_cred(fd: RawFd) -> Result<UCred> {
    let ucred: libc::ucred = getsockopt(fd, libc::SOL_SOCKET, libc::SO_PEERCRED)?;

    debug_assert_eq!(mem::size_of::<libc::ucred>(), 12);

    Ok(UCred {
        pid: ucred.pid,
        uid: ucred.uid,
        gid: ucred.gid,
    })
}
