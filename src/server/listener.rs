// Listener setup module
// Builds the TCP listener with explicit socket options before handing it to tokio

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Accept backlog queue size
const BACKLOG: i32 = 128;

/// Create the listening socket for `addr`.
///
/// `SO_REUSEADDR` lets the server rebind a port still in TIME_WAIT after a
/// quick stop/start cycle. The socket is switched to non-blocking mode
/// before conversion into a tokio listener.
pub fn bind_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
