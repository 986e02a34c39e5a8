//! Outbound frame construction: RadioTap + 802.11 Acknowledgement, and
//! RadioTap + 802.11 Ad-Hoc Data wrapping an Ethernet II payload.
//!
//! Builders always return a fresh, caller-owned buffer. `_into` variants are
//! provided for callers that want to reuse a buffer across calls (spec.md
//! §9 "Outbound-frame buffer reuse"); the allocating variants are
//! implemented in terms of them.

use crate::mac;
use crate::radiotap::PhysicalDeviceParameters;

/// Present-bit flags this builder always sets: Flags(1), Rate(2), Channel(3),
/// TX flags(15).
const SEND_PRESENT_FLAGS: u32 = (1 << 1) | (1 << 2) | (1 << 3) | (1 << 15);

/// Present bit for the optional MCS fields.
const MCS_PRESENT_BIT: u32 = 1 << 19;

/// Arbitrary placeholder TX-flags value written into every built RadioTap
/// header; the original's `noack`-ish constant carried no meaning this
/// crate's receivers inspect. Two bytes, matching the RadioTap TX-flags
/// field's real on-wire size (present-bit 15).
const TX_FLAGS: u16 = 0x0008;

/// Size of the fixed RadioTap header this builder writes, before any
/// optional MCS bytes: 8 (fixed prefix) + 1 (flags) + 1 (rate) + 4 (channel)
/// + 2 (tx flags).
const RADIOTAP_SIZE: u16 = 16;

/// First Frame Control byte for an Acknowledgement frame.
pub const ACKNOWLEDGEMENT_TYPE: u8 = 0xD4;
/// First Frame Control byte for a Data frame.
pub const WLAN_FC_TYPE_DATA: u8 = 0x08;

/// Minimum buffer capacity the `_into` variants require: the RadioTap
/// header plus the largest outbound 802.11 header this crate writes.
pub const MIN_BUFFER_CAPACITY: usize = RADIOTAP_SIZE as usize + 3 + 28;

pub struct FrameBuilder;

impl FrameBuilder {
    /// Builds a RadioTap header for the given PHY parameters.
    pub fn build_radiotap(params: &PhysicalDeviceParameters) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MIN_BUFFER_CAPACITY);
        Self::build_radiotap_into(params, &mut buf);
        buf
    }

    /// Writes a RadioTap header into `buf`, appending to whatever it
    /// already contains.
    pub fn build_radiotap_into(params: &PhysicalDeviceParameters, buf: &mut Vec<u8>) {
        let has_mcs = params.mcs_known != 0;
        let mut present = SEND_PRESENT_FLAGS;
        let mut length = RADIOTAP_SIZE;
        if has_mcs {
            present |= MCS_PRESENT_BIT;
            length += 3;
        }

        buf.push(0); // revision
        buf.push(0); // pad
        buf.extend_from_slice(&length.to_le_bytes());
        buf.extend_from_slice(&present.to_le_bytes());
        buf.push(params.flags);
        buf.push(params.data_rate);
        buf.extend_from_slice(&params.frequency.to_le_bytes());
        buf.extend_from_slice(&params.channel_flags.to_le_bytes());
        buf.extend_from_slice(&TX_FLAGS.to_le_bytes());
        if has_mcs {
            buf.push(params.mcs_known);
            buf.push(params.mcs_flags);
            buf.push(params.mcs_index);
        }
    }

    /// Builds `radiotap ‖ ack_header` for an Acknowledgement targeting
    /// `receiver_mac` (canonical form).
    pub fn build_ack(receiver_mac: u64, params: &PhysicalDeviceParameters) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MIN_BUFFER_CAPACITY);
        Self::build_ack_into(receiver_mac, params, &mut buf);
        buf
    }

    pub fn build_ack_into(receiver_mac: u64, params: &PhysicalDeviceParameters, buf: &mut Vec<u8>) {
        Self::build_radiotap_into(params, buf);
        buf.push(ACKNOWLEDGEMENT_TYPE);
        buf.push(0x00);
        buf.extend_from_slice(&0xFFFFu16.to_le_bytes()); // duration_id
        buf.extend_from_slice(&mac::canonical_to_wire(receiver_mac));
    }

    /// Builds `radiotap ‖ ieee80211_data_header ‖ payload[12..]` — the
    /// Ad-Hoc Data wrapper around an Ethernet II `payload`
    /// (`dst(6) ‖ src(6) ‖ ethertype(2) ‖ data`).
    ///
    /// Returns an empty buffer if `payload` is too short to contain an
    /// Ethernet II destination and source address.
    pub fn build_adhoc_data(payload: &[u8], bssid: u64, params: &PhysicalDeviceParameters) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MIN_BUFFER_CAPACITY + payload.len());
        Self::build_adhoc_data_into(payload, bssid, params, &mut buf);
        buf
    }

    pub fn build_adhoc_data_into(
        payload: &[u8],
        bssid: u64,
        params: &PhysicalDeviceParameters,
        buf: &mut Vec<u8>,
    ) {
        if payload.len() < 12 {
            return;
        }
        Self::build_radiotap_into(params, buf);
        buf.push(WLAN_FC_TYPE_DATA);
        buf.push(0x00);
        buf.extend_from_slice(&0xFFFFu16.to_le_bytes()); // duration_id
        buf.extend_from_slice(&payload[0..6]); // addr1: destination
        buf.extend_from_slice(&payload[6..12]); // addr2: source
        buf.extend_from_slice(&mac::canonical_to_wire(bssid)); // addr3: BSSID
        buf.extend_from_slice(&[0u8; 6]); // addr4: unused for Ad-Hoc
        buf.extend_from_slice(&payload[12..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radiotap::RadioTapReader;

    fn sample_params() -> PhysicalDeviceParameters {
        PhysicalDeviceParameters {
            flags: 0x10,
            data_rate: 0x02,
            frequency: 2412,
            channel_flags: 0x00A0,
            mcs_known: 0,
            mcs_flags: 0,
            mcs_index: 0,
        }
    }

    #[test]
    fn build_ack_is_pure() {
        let params = sample_params();
        let a = FrameBuilder::build_ack(0xAABBCCDDEEFF, &params);
        let b = FrameBuilder::build_ack(0xAABBCCDDEEFF, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn ack_header_fields_are_correct() {
        let params = sample_params();
        let buf = FrameBuilder::build_ack(0x112233445566, &params);
        let rtl = RadioTapReader::parse(&buf).unwrap().length;
        assert_eq!(buf[rtl], ACKNOWLEDGEMENT_TYPE);
        assert_eq!(buf[rtl + 1], 0x00);
        assert_eq!(u16::from_le_bytes([buf[rtl + 2], buf[rtl + 3]]), 0xFFFF);
        assert_eq!(&buf[rtl + 4..rtl + 10], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
    }

    #[test]
    fn adhoc_data_header_fields_are_correct() {
        let params = sample_params();
        let mut eth = Vec::new();
        eth.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]); // dst
        eth.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x01]); // src
        eth.extend_from_slice(&[0x08, 0x00]); // ethertype
        eth.extend_from_slice(b"PING");

        let bssid = 0x1122_3344_5566;
        let buf = FrameBuilder::build_adhoc_data(&eth, bssid, &params);
        let rtl = RadioTapReader::parse(&buf).unwrap().length;

        assert_eq!(buf[rtl], WLAN_FC_TYPE_DATA);
        assert_eq!(&buf[rtl + 4..rtl + 10], &eth[0..6]); // addr1 = dst
        assert_eq!(&buf[rtl + 10..rtl + 16], &eth[6..12]); // addr2 = src
        assert_eq!(&buf[rtl + 16..rtl + 22], &mac::canonical_to_wire(bssid)); // addr3 = bssid
        assert_eq!(&buf[rtl + 22..rtl + 28], &[0u8; 6]); // addr4
        assert_eq!(&buf[rtl + 28..], b"\x08\x00PING");
    }

    #[test]
    fn adhoc_data_too_short_payload_yields_empty() {
        let params = sample_params();
        let buf = FrameBuilder::build_adhoc_data(&[0u8; 4], 0, &params);
        assert!(buf.is_empty());
    }

    #[test]
    fn mcs_present_bit_is_ored_not_anded() {
        // spec Open Question 2: MCS bit must be OR'd into present_flags, not
        // AND'd (which would clear the other present bits).
        let mut params = sample_params();
        params.mcs_known = 1;
        let buf = FrameBuilder::build_radiotap(&params);
        let present = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        assert_eq!(present & SEND_PRESENT_FLAGS, SEND_PRESENT_FLAGS);
        assert_ne!(present & (1 << 19), 0);
    }

    #[test]
    fn build_radiotap_into_appends_without_clearing() {
        let mut buf = vec![0xFFu8; 3];
        FrameBuilder::build_radiotap_into(&sample_params(), &mut buf);
        assert_eq!(&buf[0..3], &[0xFF, 0xFF, 0xFF]);
        assert_eq!(buf.len(), 3 + RADIOTAP_SIZE as usize);
    }
}
