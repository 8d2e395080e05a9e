use std::os::unix::io::RawFd;
use std::time::Duration;

use crate::sys::unix::fd::FdGuard;
use crate::sys::unix::cvt;
use crate::{Interest, Result, Token};

pub(crate) type RawEvent = libc::epoll_event;

/// Lowest file descriptor used in `Selector::try_clone`, above the
/// standard streams.
const LOWEST_FD: libc::c_int = 3;

/// The kernel readiness table and its blocking wait primitive.
///
/// Owns the epoll descriptor. All control operations are serialized
/// by the kernel; only the wait is restricted to one caller at a
/// time, which `Poll` enforces at the type level.
#[derive(Debug)]
pub(crate) struct Selector {
    ep: FdGuard,
}

impl Selector {
    pub(crate) fn new() -> Result<Selector> {
        let ep = cvt(unsafe { libc::epoll_create1(libc::EPOLL_CLOEXEC) })?;
        Ok(Selector { ep: FdGuard::new(ep) })
    }

    /// Duplicates the epoll descriptor; both selectors observe the
    /// same registration table.
    pub(crate) fn try_clone(&self) -> Result<Selector> {
        let ep = cvt(unsafe { libc::fcntl(self.ep.raw(), libc::F_DUPFD_CLOEXEC, LOWEST_FD) })?;
        Ok(Selector { ep: FdGuard::new(ep) })
    }

    pub(crate) fn select(
        &self,
        events: &mut Vec<RawEvent>,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let timeout = timeout_millis(timeout);

        loop {
            let n = unsafe {
                libc::epoll_wait(
                    self.ep.raw(),
                    events.as_mut_ptr(),
                    events.capacity() as libc::c_int,
                    timeout,
                )
            };

            match cvt(n) {
                Ok(n) => {
                    unsafe { events.set_len(n as usize) };
                    return Ok(());
                }
                Err(ref e) if e.is_interrupted() => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub(crate) fn register(&self, fd: RawFd, token: Token, interests: Interest) -> Result<()> {
        let mut event = RawEvent {
            events: interests_to_epoll(interests),
            u64: token.0,
        };

        cvt(unsafe { libc::epoll_ctl(self.ep.raw(), libc::EPOLL_CTL_ADD, fd, &mut event) })
            .map(|_| ())
    }

    pub(crate) fn reregister(&self, fd: RawFd, token: Token, interests: Interest) -> Result<()> {
        let mut event = RawEvent {
            events: interests_to_epoll(interests),
            u64: token.0,
        };

        cvt(unsafe { libc::epoll_ctl(self.ep.raw(), libc::EPOLL_CTL_MOD, fd, &mut event) })
            .map(|_| ())
    }

    pub(crate) fn deregister(&self, fd: RawFd) -> Result<()> {
        cvt(unsafe {
            libc::epoll_ctl(
                self.ep.raw(),
                libc::EPOLL_CTL_DEL,
                fd,
                std::ptr::null_mut(),
            )
        })
        .map(|_| ())
    }
}

/// The interest to kernel flag table.
///
/// Edge-triggered mode is unconditional. Readable interest also asks
/// for the peer write-half close notification so it can be surfaced
/// as a read-closed event.
fn interests_to_epoll(interests: Interest) -> u32 {
    let mut kind = libc::EPOLLET;

    if interests.is_readable() {
        kind |= libc::EPOLLIN | libc::EPOLLRDHUP;
    }

    if interests.is_writable() {
        kind |= libc::EPOLLOUT;
    }

    if interests.is_priority() {
        kind |= libc::EPOLLPRI;
    }

    kind as u32
}

/// Converts the optional timeout into epoll milliseconds.
///
/// Sub-millisecond remainders round up: truncating would turn a
/// short sleep into a busy poll. `None` blocks indefinitely and zero
/// stays zero.
fn timeout_millis(timeout: Option<Duration>) -> libc::c_int {
    let timeout = match timeout {
        Some(timeout) => timeout,
        None => return -1,
    };

    let mut millis = timeout.as_millis();
    if Duration::from_millis(millis as u64) < timeout {
        millis += 1;
    }

    std::cmp::min(millis, libc::c_int::max_value() as u128) as libc::c_int
}

#[cfg(test)]
mod test {
    use super::{interests_to_epoll, timeout_millis};
    use crate::Interest;
    use std::time::Duration;

    #[test]
    fn test_flag_table_always_edge_triggered() {
        let et = libc::EPOLLET as u32;

        assert_eq!(interests_to_epoll(Interest::empty()) & et, et);
        assert_eq!(interests_to_epoll(Interest::WRITABLE) & et, et);
    }

    #[test]
    fn test_flag_table_readable_implies_rdhup() {
        let flags = interests_to_epoll(Interest::READABLE);

        assert_ne!(flags & libc::EPOLLIN as u32, 0);
        assert_ne!(flags & libc::EPOLLRDHUP as u32, 0);
        assert_eq!(flags & libc::EPOLLOUT as u32, 0);
    }

    #[test]
    fn test_flag_table_writable_and_priority() {
        let flags = interests_to_epoll(Interest::WRITABLE | Interest::PRIORITY);

        assert_ne!(flags & libc::EPOLLOUT as u32, 0);
        assert_ne!(flags & libc::EPOLLPRI as u32, 0);
        assert_eq!(flags & libc::EPOLLIN as u32, 0);
    }

    #[test]
    fn test_timeout_rounds_up_not_down() {
        assert_eq!(timeout_millis(None), -1);
        assert_eq!(timeout_millis(Some(Duration::from_millis(0))), 0);
        assert_eq!(timeout_millis(Some(Duration::from_micros(100))), 1);
        assert_eq!(timeout_millis(Some(Duration::from_millis(250))), 250);
        assert_eq!(timeout_millis(Some(Duration::from_micros(1500))), 2);
    }
}
