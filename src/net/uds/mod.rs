mod addr;
mod datagram;
mod listener;
mod stream;
mod ucred;

pub use self::addr::SocketAddr;
pub use self::datagram::UnixDatagram;
pub use self::listener::UnixListener;
pub use self::stream::UnixStream;
pub use self::ucred::UCred;
