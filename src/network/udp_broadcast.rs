//! ## Håndterer UDP-broadcast i systemet
//!
//! Every node sends its [StatusMessage] to the broadcast address on a shared port, and listens
//! on the same port. Nothing here filters: the listener forwards every packet carrying the key,
//! and the control loop decides what to accept.

use crate::config;
use crate::print;
use crate::world_view::serial;
use crate::world_view::StatusMessage;

use std::io;
use std::net::SocketAddr;
use socket2::{Domain, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;


/// Creates a non-blocking, reusable, broadcast-enabled UDP socket bound to `ip:port`.
pub fn broadcast_socket(ip: &str, port: u16) -> io::Result<UdpSocket> {
    let socket_addr: SocketAddr = format!("{}:{}", ip, port)
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, None)?;

    socket.set_nonblocking(true)?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;
    socket.bind(&socket_addr.into())?;
    UdpSocket::from_std(socket.into())
}

// ### Starter og kjører udp-broadcaster
/// Broadcasts every status message received on `status_rx` to `255.255.255.255:<port>`.
///
/// ## Behavior
/// - Sets up a reusable broadcast socket on an ephemeral port
/// - Sends each message as one packet, see [serial::serialize_status]
/// - Send errors are logged, the next message is tried anyway
///
/// ## Returns
/// `Ok(())` when the sending side of `status_rx` is dropped, or the socket setup error.
pub async fn start_udp_broadcaster(port: u16, mut status_rx: mpsc::Receiver<StatusMessage>) -> io::Result<()> {
    let broadcast_addr: SocketAddr = format!("{}:{}", config::BC_ADDR, port)
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let socket = broadcast_socket(config::BC_LISTEN_ADDR, 0)?;

    while let Some(msg) = status_rx.recv().await {
        let Some(packet) = serial::serialize_status(&msg) else {
            continue;
        };
        if let Err(e) = socket.send_to(&packet, &broadcast_addr).await {
            print::warn(format!("UDP broadcast failed: {}", e));
        }
    }
    Ok(())
}

// ### Starter og kjører udp-listener
/// Listens for status broadcasts on `port` and forwards every decodable one on `status_tx`.
///
/// ## Returns
/// `Ok(())` when the receiving side of `status_tx` is dropped, or the socket setup error.
pub async fn start_udp_listener(port: u16, status_tx: mpsc::Sender<StatusMessage>) -> io::Result<()> {
    let socket = broadcast_socket(config::BC_LISTEN_ADDR, port)?;
    listen(socket, status_tx).await
}

/// Receive loop of [start_udp_listener] on an already bound socket.
pub async fn listen(socket: UdpSocket, status_tx: mpsc::Sender<StatusMessage>) -> io::Result<()> {
    let mut buf = vec![0u8; config::UDP_BUFFER];
    loop {
        let len = match socket.recv_from(&mut buf).await {
            Ok((len, _)) => len,
            Err(e) => {
                print::warn(format!("UDP receive failed: {}", e));
                continue;
            }
        };
        // Pakker utan nøkkel eller som ikkje kan dekodast blir ignorert
        if let Some(msg) = serial::deserialize_status(&buf[..len]) {
            if status_tx.send(msg).await.is_err() {
                return Ok(());
            }
        }
    }
}
