//! Beacon frame body parsing.
//!
//! Input is the 802.11 MAC header onward (i.e. the RadioTap length has
//! already been skipped by the caller). Walks the 24-byte MAC header, the
//! 12-byte fixed Beacon parameter block, then the tagged parameter list.

use thiserror::Error;

const MAC_HEADER_LEN: usize = 24;
const FIXED_BEACON_PARAMS_LEN: usize = 12; // timestamp(8) + interval(2) + capabilities(2)
const TAGS_START: usize = MAC_HEADER_LEN + FIXED_BEACON_PARAMS_LEN;

const TAG_SSID: u8 = 0;
const TAG_SUPPORTED_RATES: u8 = 1;
const TAG_DS_PARAMETER_SET: u8 = 3;
const TAG_EXTENDED_RATES: u8 = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("beacon frame body ends before the tagged parameter walk completes")]
    TruncatedBeacon,
}

/// Information extracted from an accepted Beacon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BeaconInfo {
    pub ssid: String,
    pub max_rate: u8,
    /// Channel-derived frequency in MHz, or `-1` if not determinable.
    pub frequency: i32,
}

/// Stateless parser for Beacon frame bodies.
pub struct BeaconReader;

impl BeaconReader {
    /// Parses a Beacon frame starting at its 802.11 MAC header.
    pub fn parse(bytes: &[u8]) -> Result<BeaconInfo, ParseError> {
        if bytes.len() < TAGS_START {
            return Err(ParseError::TruncatedBeacon);
        }

        let mut info = BeaconInfo::default();
        let mut offset = TAGS_START;

        while offset < bytes.len() {
            if offset + 2 > bytes.len() {
                return Err(ParseError::TruncatedBeacon);
            }
            let tag = bytes[offset];
            let len = bytes[offset + 1] as usize;
            let value_start = offset + 2;
            if value_start + len > bytes.len() {
                return Err(ParseError::TruncatedBeacon);
            }
            let value = &bytes[value_start..value_start + len];

            match tag {
                TAG_SSID => {
                    info.ssid = match core::str::from_utf8(value) {
                        Ok(s) => s.to_string(),
                        Err(_) => String::from_utf8_lossy(value).into_owned(),
                    };
                }
                TAG_SUPPORTED_RATES | TAG_EXTENDED_RATES => {
                    if let Some(&highest) = value.iter().max() {
                        let rate = (highest & 0x7F).saturating_mul(2);
                        if rate > info.max_rate {
                            info.max_rate = rate;
                        }
                    }
                }
                TAG_DS_PARAMETER_SET => {
                    if let Some(&channel) = value.first() {
                        info.frequency = channel_to_frequency(channel);
                    }
                }
                _ => {}
            }

            offset = value_start + len;
        }

        Ok(info)
    }
}

/// Converts a 2.4 GHz channel number (1..13) to its center frequency in MHz.
/// Returns `-1` for channels outside that range.
pub fn channel_to_frequency(channel: u8) -> i32 {
    if (1..=13).contains(&channel) {
        2412 + (channel as i32 - 1) * 5
    } else {
        -1
    }
}
