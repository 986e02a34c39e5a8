//! The driver loop: pulls frames from a `CaptureSource`, feeds them through
//! `FilterState`, and forwards conversions/acknowledgements to a
//! `FrameSink`.

use crate::capture::CaptureSource;
use crate::diagnostics::{DiagnosticSink, Level};
use crate::error::AppError;
use crate::filter::{self, FilterState};
use crate::sink::FrameSink;

/// Runs the capture/convert/forward loop until `capture` is exhausted or an
/// I/O error occurs. Non-fatal per-frame problems are reported through
/// `state`'s own diagnostic sink and do not stop the loop (spec.md §7); only
/// capture and sink I/O errors are fatal here.
pub fn run(
    capture: &mut dyn CaptureSource,
    sink: &mut dyn FrameSink,
    state: &mut FilterState,
    diag: &dyn DiagnosticSink,
) -> Result<(), AppError> {
    while let Some(frame) = capture.next_frame()? {
        if frame.is_empty() {
            continue; // capture timeout tick, nothing received
        }

        state.update(&frame);

        if state.is_convertible() {
            let eth = state.convert_to_ethernet();
            if !eth.is_empty() {
                if let Err(err) = sink.send_ethernet(&eth) {
                    diag.log(Level::Warn, &format!("failed to forward ethernet frame: {err}"));
                }
            }
        }

        if state.is_ackable() {
            let ack = filter::build_ack(state, state.destination_mac());
            if let Err(err) = sink.send_raw(&ack) {
                diag.log(Level::Warn, &format!("failed to send acknowledgement: {err}"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SliceCaptureSource;
    use crate::diagnostics::NullSink;
    use crate::sink::CollectingFrameSink;

    fn radiotap_header() -> Vec<u8> {
        let present: u32 = 1 << 1;
        let mut buf = vec![0u8, 0, 0, 0];
        buf.extend_from_slice(&present.to_le_bytes());
        buf.push(0x00);
        let len = buf.len() as u16;
        buf[2..4].copy_from_slice(&len.to_le_bytes());
        buf
    }

    fn beacon_frame(ssid: &str, bssid: [u8; 6]) -> Vec<u8> {
        let mut frame = radiotap_header();
        frame.push(0x80);
        frame.push(0x00);
        frame.extend_from_slice(&[0, 0]);
        frame.extend_from_slice(&[0xFF; 6]);
        frame.extend_from_slice(&bssid);
        frame.extend_from_slice(&bssid);
        frame.extend_from_slice(&[0, 0]);
        frame.extend_from_slice(&[0u8; 8]);
        frame.extend_from_slice(&[0x64, 0]);
        frame.extend_from_slice(&[0x01, 0]);
        frame.push(0);
        frame.push(ssid.len() as u8);
        frame.extend_from_slice(ssid.as_bytes());
        frame
    }

    fn data_frame(addr1: [u8; 6], addr2: [u8; 6], addr3: [u8; 6], payload: &[u8]) -> Vec<u8> {
        let mut frame = radiotap_header();
        frame.push(0x08);
        frame.push(0x00);
        frame.extend_from_slice(&[0, 0]);
        frame.extend_from_slice(&addr1);
        frame.extend_from_slice(&addr2);
        frame.extend_from_slice(&addr3);
        frame.extend_from_slice(&[0, 0]);
        frame.extend_from_slice(payload);
        frame
    }

    #[test]
    fn drains_capture_and_forwards_converted_frames() {
        let bssid = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        let mut payload = vec![0x08, 0x00];
        payload.extend_from_slice(b"PING");

        let frames = vec![
            beacon_frame("MyNet", bssid),
            data_frame([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF], [0x11, 0x22, 0x33, 0x44, 0x55, 0x01], bssid, &payload),
        ];

        let mut capture = SliceCaptureSource::new(frames);
        let mut sink = CollectingFrameSink::default();
        let mut state = FilterState::new();
        state.set_ssid_filter(["MyNet".to_string()]);

        run(&mut capture, &mut sink, &mut state, &NullSink).unwrap();

        assert_eq!(sink.ethernet_frames.len(), 1);
        assert!(!sink.raw_frames.is_empty()); // the data frame is unicast, so it is ackable
    }

    #[test]
    fn empty_capture_ticks_are_skipped() {
        let mut capture = SliceCaptureSource::new(vec![Vec::new(), Vec::new()]);
        let mut sink = CollectingFrameSink::default();
        let mut state = FilterState::new();

        run(&mut capture, &mut sink, &mut state, &NullSink).unwrap();

        assert!(sink.ethernet_frames.is_empty());
        assert!(sink.raw_frames.is_empty());
    }
}
