//! Networking primitives.
//!
//! The types provided in this module are non-blocking from creation
//! and close-on-exec by default, and every one of them is a
//! [`Source`].
//!
//! Operations never wait: when the kernel would block, they fail
//! with an error whose [`is_would_block`] is true, which is the
//! drain signal of the edge-triggered contract.
//!
//! [`Source`]: ../trait.Source.html
//! [`is_would_block`]: ../struct.Error.html#method.is_would_block

mod tcp;
mod udp;
mod uds;

pub use self::tcp::{TcpListener, TcpStream};
pub use self::udp::UdpSocket;
pub use self::uds::{SocketAddr, UCred, UnixDatagram, UnixListener, UnixStream};
