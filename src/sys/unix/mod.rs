//! Unix system api: syscall result conversion, descriptor ownership
//! and the epoll selector.

pub(crate) mod fd;
pub(crate) mod net;
pub(crate) mod selector;
pub(crate) mod uds;
pub(crate) mod waker;

pub(crate) use self::selector::{RawEvent, Selector};
pub(crate) use self::waker::Waker;

use iovec::{unix, IoVec};
use std::cmp;
use std::os::unix::io::AsRawFd;

use crate::{Error, Result};

pub(crate) trait IsMinusOne {
    fn is_minus_one(&self) -> bool;
}

impl IsMinusOne for i32 {
    fn is_minus_one(&self) -> bool {
        *self == -1
    }
}
impl IsMinusOne for isize {
    fn is_minus_one(&self) -> bool {
        *self == -1
    }
}

pub(crate) fn cvt<T: IsMinusOne>(t: T) -> Result<T> {
    if t.is_minus_one() {
        Err(Error::last_os_error())
    } else {
        Ok(t)
    }
}

pub(crate) fn set_nonblocking(fd: libc::c_int, nonblocking: bool) -> Result<()> {
    unsafe {
        let flags = cvt(libc::fcntl(fd, libc::F_GETFL))?;
        let flags = if nonblocking {
            flags | libc::O_NONBLOCK
        } else {
            flags & !libc::O_NONBLOCK
        };
        cvt(libc::fcntl(fd, libc::F_SETFL, flags)).map(|_| ())
    }
}

/*
 *
 * ===== Vectored IO =====
 *
 */

pub(crate) trait VecIo {
    fn readv(&self, bufs: &mut [&mut IoVec]) -> Result<usize>;

    fn writev(&self, bufs: &[&IoVec]) -> Result<usize>;
}

impl<T: AsRawFd> VecIo for T {
    fn readv(&self, bufs: &mut [&mut IoVec]) -> Result<usize> {
        unsafe {
            let slice = unix::as_os_slice_mut(bufs);
            let len = cmp::min(<libc::c_int>::max_value() as usize, slice.len());
            let rc = libc::readv(self.as_raw_fd(), slice.as_ptr(), len as libc::c_int);
            if rc < 0 {
                Err(Error::last_os_error())
            } else {
                Ok(rc as usize)
            }
        }
    }

    fn writev(&self, bufs: &[&IoVec]) -> Result<usize> {
        unsafe {
            let slice = unix::as_os_slice(bufs);
            let len = cmp::min(<libc::c_int>::max_value() as usize, slice.len());
            let rc = libc::writev(self.as_raw_fd(), slice.as_ptr(), len as libc::c_int);
            if rc < 0 {
                Err(Error::last_os_error())
            } else {
                Ok(rc as usize)
            }
        }
    }
}
