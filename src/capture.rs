//! Frame sources: live monitor-mode capture and a canned-slice source used
//! in tests and replay tooling.

use std::io;

/// Supplies raw captured frames (RadioTap header included) one at a time.
pub trait CaptureSource {
    /// Returns the next frame, `Ok(None)` at end of input (e.g. an offline
    /// capture file), or an I/O error from the underlying device.
    fn next_frame(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// Replays a pre-loaded sequence of frames. Used by tests and by the
/// `--replay` CLI path (`SPEC_FULL.md` §4.7).
pub struct SliceCaptureSource {
    frames: std::vec::IntoIter<Vec<u8>>,
}

impl SliceCaptureSource {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl CaptureSource for SliceCaptureSource {
    fn next_frame(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.frames.next())
    }
}

#[cfg(feature = "pcap-capture")]
mod pcap_source {
    use super::CaptureSource;
    use std::io;

    /// Wraps a live or offline `pcap` capture handle.
    pub struct PcapCaptureSource<T: pcap::Activated> {
        capture: pcap::Capture<T>,
    }

    impl PcapCaptureSource<pcap::Active> {
        /// Opens `device_name` in monitor mode and starts capturing.
        pub fn open_live(device_name: &str, snaplen: i32, timeout_ms: i32) -> Result<Self, pcap::Error> {
            let capture = pcap::Capture::from_device(device_name)?
                .promisc(true)
                .snaplen(snaplen)
                .timeout(timeout_ms)
                .open()?;
            Ok(Self { capture })
        }
    }

    impl PcapCaptureSource<pcap::Offline> {
        /// Opens a previously captured `.pcap` file for replay.
        pub fn open_file(path: &str) -> Result<Self, pcap::Error> {
            let capture = pcap::Capture::from_file(path)?;
            Ok(Self { capture })
        }
    }

    impl<T: pcap::Activated> CaptureSource for PcapCaptureSource<T> {
        fn next_frame(&mut self) -> io::Result<Option<Vec<u8>>> {
            match self.capture.next_packet() {
                Ok(packet) => Ok(Some(packet.data.to_vec())),
                Err(pcap::Error::NoMorePackets) => Ok(None),
                Err(pcap::Error::TimeoutExpired) => Ok(Some(Vec::new())),
                Err(err) => Err(io::Error::new(io::ErrorKind::Other, err)),
            }
        }
    }
}

#[cfg(feature = "pcap-capture")]
pub use pcap_source::PcapCaptureSource;
