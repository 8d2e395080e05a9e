//! The crate error type and result alias.

use std::os::raw::c_int;
use std::{error, fmt, io, result};

/// A specialized result type for readiness and I/O operations.
pub type Result<T> = result::Result<T, Error>;

/// An operating system error.
///
/// Every fallible operation in this crate reports failure as an
/// `Error` wrapping the raw OS error number. The type is `Copy` and
/// carries named predicates for the error kinds event loops actually
/// branch on, most importantly [`is_would_block`]: with
/// edge-triggered readiness, "would block" is not a failure but the
/// signal that a source has been drained.
///
/// # Examples
///
/// ```
/// use edge_net::Error;
///
/// let e = Error::from_raw_os_error(libc::EAGAIN);
///
/// assert!(e.is_would_block());
/// assert!(!e.is_interrupted());
/// ```
///
/// [`is_would_block`]: #method.is_would_block
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Error {
    code: i32,
}

impl Error {
    /// Creates an `Error` from a raw OS error number.
    ///
    /// # Examples
    ///
    /// ```
    /// use edge_net::Error;
    ///
    /// let e = Error::from_raw_os_error(libc::ECONNREFUSED);
    ///
    /// assert_eq!(e.raw_os_error(), libc::ECONNREFUSED);
    /// assert!(e.is_connection_refused());
    /// ```
    #[inline]
    pub fn from_raw_os_error(code: i32) -> Error {
        Error { code }
    }

    /// Captures the error number of the last OS error that occurred
    /// on the calling thread.
    pub fn last_os_error() -> Error {
        let code = io::Error::last_os_error().raw_os_error().unwrap_or(0);
        Error { code }
    }

    /// Returns the raw OS error number.
    #[inline]
    pub fn raw_os_error(&self) -> i32 {
        self.code
    }

    /// Returns the human-readable description of the error, as
    /// produced by the platform `strerror`.
    pub fn message(&self) -> String {
        io::Error::from_raw_os_error(self.code).to_string()
    }

    /// Returns true if the operation would have blocked.
    ///
    /// For a non-blocking source this is the end-of-drain signal,
    /// never a failure. See the crate documentation on edge-triggered
    /// draining.
    #[inline]
    pub fn is_would_block(&self) -> bool {
        self.code == libc::EAGAIN || self.code == libc::EWOULDBLOCK
    }

    /// Returns true if a signal interrupted the operation.
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.code == libc::EINTR
    }

    /// Returns true if the remote host actively refused the
    /// connection.
    #[inline]
    pub fn is_connection_refused(&self) -> bool {
        self.code == libc::ECONNREFUSED
    }

    /// Returns true if the peer reset the connection.
    #[inline]
    pub fn is_connection_reset(&self) -> bool {
        self.code == libc::ECONNRESET
    }

    /// Returns true if the connection was aborted locally.
    #[inline]
    pub fn is_connection_aborted(&self) -> bool {
        self.code == libc::ECONNABORTED
    }

    /// Returns true if the socket is not connected.
    #[inline]
    pub fn is_not_connected(&self) -> bool {
        self.code == libc::ENOTCONN
    }

    /// Returns true if the address is already in use.
    #[inline]
    pub fn is_addr_in_use(&self) -> bool {
        self.code == libc::EADDRINUSE
    }

    /// Returns true if the write side of a pipe or stream was closed
    /// by the peer.
    #[inline]
    pub fn is_broken_pipe(&self) -> bool {
        self.code == libc::EPIPE
    }

    /// Returns true if the entry already exists.
    ///
    /// Registering a descriptor that is already present in a
    /// selector's registration table fails with this error.
    #[inline]
    pub fn is_already_exists(&self) -> bool {
        self.code == libc::EEXIST
    }

    /// Returns true if the entry was not found.
    ///
    /// Re-registering or deregistering a descriptor that was never
    /// registered fails with this error.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.code == libc::ENOENT
    }

    /// Returns true if the operation is in progress.
    ///
    /// A non-blocking stream connect reports this rather than
    /// completing immediately; the socket becomes writable once the
    /// connect resolves.
    #[inline]
    pub fn is_in_progress(&self) -> bool {
        self.code == libc::EINPROGRESS
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Error")
            .field("code", &self.code)
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{} (os error {})", self.message(), self.code)
    }
}

impl error::Error for Error {}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        io::Error::from_raw_os_error(e.raw_os_error() as c_int)
    }
}

#[cfg(test)]
mod test {
    use super::Error;

    #[test]
    fn test_would_block_covers_both_codes() {
        assert!(Error::from_raw_os_error(libc::EAGAIN).is_would_block());
        assert!(Error::from_raw_os_error(libc::EWOULDBLOCK).is_would_block());
        assert!(!Error::from_raw_os_error(libc::EINTR).is_would_block());
    }

    #[test]
    fn test_predicates_match_codes() {
        let cases = [
            (libc::EINTR, Error::is_interrupted as fn(&Error) -> bool),
            (libc::ECONNREFUSED, Error::is_connection_refused),
            (libc::ECONNRESET, Error::is_connection_reset),
            (libc::ECONNABORTED, Error::is_connection_aborted),
            (libc::ENOTCONN, Error::is_not_connected),
            (libc::EADDRINUSE, Error::is_addr_in_use),
            (libc::EPIPE, Error::is_broken_pipe),
            (libc::EEXIST, Error::is_already_exists),
            (libc::ENOENT, Error::is_not_found),
            (libc::EINPROGRESS, Error::is_in_progress),
        ];

        for &(code, pred) in &cases {
            assert!(pred(&Error::from_raw_os_error(code)));
            assert!(!pred(&Error::from_raw_os_error(libc::E2BIG)));
        }
    }

    #[test]
    fn test_message_is_nonempty() {
        let e = Error::from_raw_os_error(libc::EPIPE);
        assert!(!e.message().is_empty());
        assert!(format!("{}", e).contains("os error"));
    }

    #[test]
    fn test_into_io_error() {
        let e = Error::from_raw_os_error(libc::EAGAIN);
        let io: std::io::Error = e.into();
        assert_eq!(io.kind(), std::io::ErrorKind::WouldBlock);
    }
}
