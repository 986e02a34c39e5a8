//! CLI/config surface for the bridge binary.

use std::path::PathBuf;

use clap::Parser;

/// Monitor-mode 802.11 frame handler bridging a WiFi interface to a
/// LAN-over-Internet endpoint.
#[derive(Debug, Parser)]
#[command(name = "dot11bridge", version, about)]
pub struct BridgeConfig {
    /// Monitor-mode interface to capture from, e.g. `wlan0mon`.
    #[arg(long, conflicts_with = "replay_file")]
    pub interface: Option<String>,

    /// Replay frames from a previously captured `.pcap` file instead of a
    /// live interface.
    #[arg(long)]
    pub replay_file: Option<PathBuf>,

    /// 2.4 GHz channel to tune the interface to before capturing. Ignored
    /// in replay mode.
    #[arg(long, default_value_t = 6)]
    pub channel: u8,

    /// SSIDs to accept; if empty, any SSID is accepted.
    #[arg(long = "ssid")]
    pub ssid_filter: Vec<String>,

    /// Path to a newline-separated file of whitelisted MAC addresses
    /// (`aa:bb:cc:dd:ee:ff` form). When non-empty, the blacklist is ignored.
    #[arg(long)]
    pub whitelist_file: Option<PathBuf>,

    /// Path to a newline-separated file of blacklisted MAC addresses.
    #[arg(long)]
    pub blacklist_file: Option<PathBuf>,

    /// Local address to bind the bridge socket to.
    #[arg(long, default_value = "0.0.0.0:0")]
    pub bind_addr: String,

    /// Remote bridge endpoint that converted Ethernet frames are forwarded
    /// to.
    #[arg(long)]
    pub bridge_addr: String,

    /// Diagnostic verbosity, stacking like `-v`/`-vv`/`-vvv`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl BridgeConfig {
    /// Maps the `-v` count onto a `log::LevelFilter`, matching the
    /// `env_logger` convention of progressively noisier output.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Parses a newline-separated MAC address list (`#`-prefixed lines and
/// blank lines are ignored) into canonical `u64` form.
pub fn parse_mac_list(contents: &str) -> Vec<u64> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_mac)
        .collect()
}

fn parse_mac(text: &str) -> Option<u64> {
    let mut bytes = [0u8; 6];
    let mut parts = text.split(':');
    for byte in bytes.iter_mut() {
        *byte = u8::from_str_radix(parts.next()?, 16).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(crate::mac::wire_to_canonical(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mac_list_skipping_comments_and_blanks() {
        let text = "# comment\naa:bb:cc:dd:ee:ff\n\n11:22:33:44:55:66\n";
        let macs = parse_mac_list(text);
        assert_eq!(macs, vec![0xAABB_CCDD_EEFF, 0x1122_3344_5566]);
    }

    #[test]
    fn rejects_malformed_mac() {
        assert_eq!(parse_mac("not-a-mac"), None);
        assert_eq!(parse_mac("aa:bb:cc:dd:ee"), None);
        assert_eq!(parse_mac("aa:bb:cc:dd:ee:ff:00"), None);
    }
}
