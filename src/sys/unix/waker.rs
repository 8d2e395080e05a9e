use std::os::unix::io::RawFd;

use crate::sys::unix::cvt;
use crate::sys::unix::fd::FdGuard;
use crate::Result;

/// Eventfd-backed wake primitive.
///
/// The counter is created non-blocking and close-on-exec. Writes of
/// 1 accumulate in the counter until the waiter drains it; a
/// saturated counter means a wake is already pending, so a
/// would-block on write counts as success.
#[derive(Debug)]
pub(crate) struct Waker {
    fd: FdGuard,
}

impl Waker {
    pub(crate) fn new() -> Result<Waker> {
        let fd = cvt(unsafe { libc::eventfd(0, libc::EFD_CLOEXEC | libc::EFD_NONBLOCK) })?;
        Ok(Waker { fd: FdGuard::new(fd) })
    }

    pub(crate) fn raw(&self) -> RawFd {
        self.fd.raw()
    }

    pub(crate) fn wake(&self) -> Result<()> {
        let buf: u64 = 1;
        let res = cvt(unsafe {
            libc::write(
                self.fd.raw(),
                &buf as *const u64 as *const libc::c_void,
                std::mem::size_of::<u64>(),
            )
        });

        match res {
            Ok(_) => Ok(()),
            // The counter is saturated; the pending wake will be
            // observed by the waiter.
            Err(ref e) if e.is_would_block() => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn drain(&self) {
        let mut buf: u64 = 0;
        let _ = unsafe {
            libc::read(
                self.fd.raw(),
                &mut buf as *mut u64 as *mut libc::c_void,
                std::mem::size_of::<u64>(),
            )
        };
    }
}
