//! Unix-only primitives: the raw-descriptor adapter and non-blocking
//! pipes.

pub mod pipe;

mod sourcefd;

pub use self::sourcefd::SourceFd;
