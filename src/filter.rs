//! The per-session filter/state handler (`FilterState`) — the central
//! `update` state transition, MAC/SSID allow-deny lists, and PHY-parameter
//! snapshots described in spec.md §3/§4.4.

use std::collections::HashSet;

use crate::beacon::BeaconReader;
use crate::builder::FrameBuilder;
use crate::classify::{CtrlSub, DataSub, FrameClassifier, FrameKind, MgmtSub};
use crate::diagnostics::{DiagnosticSink, Level, NullSink};
use crate::error::{ClassifyError, ConvertError};
use crate::mac::{self, BROADCAST};
use crate::radiotap::{PhysicalDeviceParameters, RadioTapReader};

/// Frame Control byte 1 value meaning "this is a QoS retry" (spec.md §6).
const DATA_QOS_RETRY_FLAG: u8 = 0x08;

const DESTINATION_ADDRESS_INDEX: usize = 4;
const SOURCE_ADDRESS_INDEX: usize = 10;
const BSSID_INDEX: usize = 16;
const ETHERTYPE_INDEX: usize = 24;
const DATA_INDEX: usize = 26;
const DATA_HEADER_LENGTH: usize = 24;
const QOS_CONTROL_LENGTH: usize = 2;

/// The per-session allow/deny state, PHY-parameter snapshots, and
/// derived-per-frame fields described in spec.md §3.
///
/// `last_raw_frame` is stored as an owned buffer rather than a borrow of the
/// caller's frame: `update` is called once per received frame from a single
/// driver thread, and copying the (typically small, already-allocated)
/// frame avoids tying `FilterState`'s lifetime to its caller's buffer
/// lifetime across repeated calls, which `spec.md` §5 does not require —
/// only that the view be valid for the duration of a single `update` plus
/// the accessor calls made before the next one, which an owned copy trivially
/// satisfies.
pub struct FilterState {
    whitelist: HashSet<u64>,
    blacklist: HashSet<u64>,
    ssid_list: HashSet<String>,

    locked_bssid: Option<u64>,
    last_data_params: PhysicalDeviceParameters,
    last_control_params: PhysicalDeviceParameters,

    last_raw_frame: Vec<u8>,
    src_mac: u64,
    dst_mac: u64,
    is_ackable: bool,
    is_qos_retry: bool,
    current_kind: Option<FrameKind>,

    diag: Box<dyn DiagnosticSink>,
}

impl FilterState {
    /// Creates a session with no filters set and a `NullSink` diagnostic
    /// sink.
    pub fn new() -> Self {
        Self::with_diagnostics(NullSink)
    }

    /// Creates a session that emits diagnostics through `diag`.
    pub fn with_diagnostics(diag: impl DiagnosticSink + 'static) -> Self {
        Self {
            whitelist: HashSet::new(),
            blacklist: HashSet::new(),
            ssid_list: HashSet::new(),
            locked_bssid: None,
            last_data_params: PhysicalDeviceParameters::default(),
            last_control_params: PhysicalDeviceParameters::default(),
            last_raw_frame: Vec::new(),
            src_mac: 0,
            dst_mac: 0,
            is_ackable: false,
            is_qos_retry: false,
            current_kind: None,
            diag: Box::new(diag),
        }
    }

    // ── Filter list management ──────────────────────────────────────

    pub fn set_whitelist(&mut self, list: impl IntoIterator<Item = u64>) {
        self.whitelist = list.into_iter().collect();
    }

    pub fn set_blacklist(&mut self, list: impl IntoIterator<Item = u64>) {
        self.blacklist = list.into_iter().collect();
    }

    pub fn set_ssid_filter(&mut self, list: impl IntoIterator<Item = String>) {
        self.ssid_list = list.into_iter().collect();
    }

    pub fn add_blacklist(&mut self, mac: u64) {
        self.blacklist.insert(mac);
    }

    pub fn add_whitelist(&mut self, mac: u64) {
        self.whitelist.insert(mac);
    }

    pub fn clear_blacklist(&mut self) {
        self.blacklist.clear();
    }

    pub fn clear_whitelist(&mut self) {
        self.whitelist.clear();
    }

    fn is_mac_allowed(&self, mac: u64) -> bool {
        if !self.whitelist.is_empty() {
            self.whitelist.contains(&mac)
        } else {
            !self.blacklist.contains(&mac)
        }
    }

    fn is_ssid_allowed(&self, ssid: &str) -> bool {
        self.ssid_list.is_empty() || self.ssid_list.contains(ssid)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn last_frame(&self) -> &[u8] {
        &self.last_raw_frame
    }

    pub fn locked_bssid(&self) -> Option<u64> {
        self.locked_bssid
    }

    pub fn destination_mac(&self) -> u64 {
        self.dst_mac
    }

    pub fn data_params(&self) -> &PhysicalDeviceParameters {
        &self.last_data_params
    }

    pub fn control_params(&self) -> &PhysicalDeviceParameters {
        &self.last_control_params
    }

    pub fn is_ackable(&self) -> bool {
        self.is_ackable
    }

    /// True iff the last frame is a Data subtype that carries payload and is
    /// not a QoS retry (spec.md §4.4).
    pub fn is_convertible(&self) -> bool {
        if self.is_qos_retry {
            return false;
        }
        matches!(self.current_kind, Some(FrameKind::Data(sub)) if sub.carries_payload())
    }

    // ── The central receive-side state transition ──────────────────

    pub fn update(&mut self, frame_bytes: &[u8]) {
        self.last_raw_frame.clear();
        self.last_raw_frame.extend_from_slice(frame_bytes);
        self.is_ackable = false;

        let header = match RadioTapReader::parse(frame_bytes) {
            Ok(h) => h,
            Err(_) => {
                self.diag.log(Level::Warn, "failed to parse RadioTap header");
                return;
            }
        };
        let rtl = header.length;

        if frame_bytes.len() < rtl + 2 {
            self.current_kind = None;
            self.diag.log(Level::Warn, "frame too short for Frame Control field");
            return;
        }
        let fc0 = frame_bytes[rtl];
        let fc1 = frame_bytes[rtl + 1];
        let kind = FrameClassifier::classify(fc0, fc1);
        self.current_kind = Some(kind);

        match kind {
            FrameKind::Management(sub) => self.update_management(frame_bytes, rtl, sub),
            FrameKind::Data(sub) => self.update_data(frame_bytes, rtl, sub, fc1, &header.params),
            FrameKind::Control(sub) => self.update_control(frame_bytes, rtl, sub, &header.params),
            FrameKind::Unknown => {
                self.diag
                    .log(Level::Debug, &ClassifyError::UnknownSubtype(fc0).to_string());
            }
        }
    }

    fn update_management(&mut self, frame: &[u8], rtl: usize, sub: MgmtSub) {
        let Some(src) = read_mac(frame, rtl + SOURCE_ADDRESS_INDEX) else {
            return;
        };
        self.src_mac = src;
        if !self.is_mac_allowed(src) {
            return;
        }

        if sub != MgmtSub::Beacon {
            return;
        }

        let Ok(beacon) = BeaconReader::parse(&frame[rtl..]) else {
            self.diag.log(Level::Warn, "failed to parse beacon body");
            return;
        };

        if !self.is_ssid_allowed(&beacon.ssid) {
            return;
        }

        let Some(bssid) = read_mac(frame, rtl + BSSID_INDEX) else {
            return;
        };

        if self.locked_bssid != Some(bssid) {
            self.locked_bssid = Some(bssid);
            self.diag.log(
                Level::Debug,
                &format!("SSID switched: {} , BSSID: {:012X}", beacon.ssid, bssid),
            );
        }
    }

    fn update_data(
        &mut self,
        frame: &[u8],
        rtl: usize,
        sub: DataSub,
        fc1: u8,
        live_params: &PhysicalDeviceParameters,
    ) {
        let Some(src) = read_mac(frame, rtl + SOURCE_ADDRESS_INDEX) else {
            return;
        };
        self.src_mac = src;

        let Some(frame_bssid) = read_mac(frame, rtl + BSSID_INDEX) else {
            return;
        };
        if !self.is_mac_allowed(src) || self.locked_bssid != Some(frame_bssid) {
            return;
        }

        let Some(dst) = read_mac(frame, rtl + DESTINATION_ADDRESS_INDEX) else {
            return;
        };
        self.dst_mac = dst;
        self.is_ackable = dst != BROADCAST;

        self.is_qos_retry = sub.is_qos() && fc1 == DATA_QOS_RETRY_FLAG;

        if !self.is_qos_retry && sub.commits_data_params() {
            self.last_data_params = *live_params;
        }
    }

    fn update_control(&mut self, frame: &[u8], rtl: usize, sub: CtrlSub, live_params: &PhysicalDeviceParameters) {
        let Some(dst) = read_mac(frame, rtl + DESTINATION_ADDRESS_INDEX) else {
            return;
        };
        self.dst_mac = dst;

        if !self.blacklist.contains(&dst) {
            return;
        }

        if sub == CtrlSub::ACK {
            self.last_control_params = *live_params;
        }
    }

    // ── Conversion ───────────────────────────────────────────────────

    /// Produces an Ethernet II frame from the last received data frame.
    /// Returns an empty `Vec` on non-convertible frames.
    pub fn convert_to_ethernet(&mut self) -> Vec<u8> {
        let Some(FrameKind::Data(sub)) = self.current_kind else {
            self.diag
                .log(Level::Debug, &ConvertError::NonConvertibleSubtype.to_string());
            return Vec::new();
        };
        if !sub.carries_payload() {
            self.diag
                .log(Level::Debug, &ConvertError::NonConvertibleSubtype.to_string());
            return Vec::new();
        }

        let frame = self.last_raw_frame.as_slice();
        let Ok(header) = RadioTapReader::parse(frame) else {
            self.diag.log(Level::Warn, &ConvertError::FrameTooShort.to_string());
            return Vec::new();
        };
        let rtl = header.length;

        if frame.len() <= rtl + DATA_HEADER_LENGTH {
            self.diag.log(Level::Warn, &ConvertError::FrameTooShort.to_string());
            return Vec::new();
        }

        let fcs_length = if header.params.flags & crate::radiotap::FCS_AVAILABLE_FLAG != 0 {
            4
        } else {
            0
        };

        let qos_extra = if sub.is_qos() { QOS_CONTROL_LENGTH } else { 0 };
        let ethertype_off = rtl + ETHERTYPE_INDEX + qos_extra;
        let data_off = rtl + DATA_INDEX + qos_extra;

        if ethertype_off + 2 > frame.len() || data_off > frame.len() - fcs_length {
            self.diag.log(Level::Warn, &ConvertError::FrameTooShort.to_string());
            return Vec::new();
        }

        let addr_dst = &frame[rtl + DESTINATION_ADDRESS_INDEX..rtl + DESTINATION_ADDRESS_INDEX + 6];
        let addr_src = &frame[rtl + SOURCE_ADDRESS_INDEX..rtl + SOURCE_ADDRESS_INDEX + 6];

        let mut out = Vec::with_capacity(12 + 2 + (frame.len() - data_off - fcs_length));
        out.extend_from_slice(addr_dst);
        out.extend_from_slice(addr_src);
        out.extend_from_slice(&frame[ethertype_off..ethertype_off + 2]);
        out.extend_from_slice(&frame[data_off..frame.len() - fcs_length]);
        out
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

fn read_mac(frame: &[u8], offset: usize) -> Option<u64> {
    let bytes: [u8; 6] = frame.get(offset..offset + 6)?.try_into().ok()?;
    Some(mac::wire_to_canonical(&bytes))
}

/// Builds an Acknowledgement frame for `target_mac` using the session's
/// last captured control-path PHY parameters.
pub fn build_ack(state: &FilterState, target_mac: u64) -> Vec<u8> {
    FrameBuilder::build_ack(target_mac, state.control_params())
}

/// Builds an Ad-Hoc Data wrapper for `payload` using the session's last
/// captured data-path PHY parameters.
pub fn build_adhoc_data(state: &FilterState, payload: &[u8], bssid: u64) -> Vec<u8> {
    FrameBuilder::build_adhoc_data(payload, bssid, state.data_params())
}
