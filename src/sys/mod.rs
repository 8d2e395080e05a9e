//! Backend glue.
//!
//! Exactly one readiness backend is bound at build time through
//! Cargo features. `epoll` is the implemented backend; `io-uring` is
//! reserved for a future asynchronous-submission backend and must
//! not be enabled.

#[cfg(feature = "io-uring")]
compile_error!(
    "the `io-uring` backend is reserved for future work and cannot be enabled yet"
);

#[cfg(not(feature = "epoll"))]
compile_error!("no readiness backend selected; build with the `epoll` feature");

#[cfg(feature = "epoll")]
pub(crate) mod unix;

#[cfg(feature = "epoll")]
pub(crate) use self::unix::{RawEvent, Selector, Waker};
