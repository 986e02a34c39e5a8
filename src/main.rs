//! `dot11bridge` — monitor-mode 802.11 frame handler bridging a WiFi
//! interface to a LAN-over-Internet endpoint.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use dot11bridge::app;
use dot11bridge::capture::{CaptureSource, SliceCaptureSource};
use dot11bridge::config::{self, BridgeConfig};
use dot11bridge::diagnostics::LogSink;
use dot11bridge::error::AppError;
use dot11bridge::filter::FilterState;
use dot11bridge::sink::{FrameSink, UdpFrameSink};

#[cfg(feature = "pcap-capture")]
use dot11bridge::capture::PcapCaptureSource;

fn main() -> ExitCode {
    let config = BridgeConfig::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level_filter())
        .init();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: BridgeConfig) -> Result<(), AppError> {
    let mut state = FilterState::with_diagnostics(LogSink);

    if let Some(path) = &config.whitelist_file {
        let contents = fs::read_to_string(path).map_err(|source| AppError::Config {
            path: path.display().to_string(),
            source,
        })?;
        state.set_whitelist(config::parse_mac_list(&contents));
    }
    if let Some(path) = &config.blacklist_file {
        let contents = fs::read_to_string(path).map_err(|source| AppError::Config {
            path: path.display().to_string(),
            source,
        })?;
        state.set_blacklist(config::parse_mac_list(&contents));
    }
    state.set_ssid_filter(config.ssid_filter.clone());

    let mut capture = open_capture(&config)?;
    let mut sink: Box<dyn FrameSink> = Box::new(UdpFrameSink::connect(&config.bind_addr, &config.bridge_addr)?);

    app::run(capture.as_mut(), sink.as_mut(), &mut state, &LogSink)
}

fn open_capture(config: &BridgeConfig) -> Result<Box<dyn CaptureSource>, AppError> {
    if let Some(path) = &config.replay_file {
        #[cfg(feature = "pcap-capture")]
        {
            let source = PcapCaptureSource::open_file(&path.display().to_string()).map_err(|err| AppError::Config {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, err),
            })?;
            return Ok(Box::new(source));
        }
        #[cfg(not(feature = "pcap-capture"))]
        {
            let _ = path;
            return Ok(Box::new(SliceCaptureSource::new(Vec::new())));
        }
    }

    #[cfg(feature = "pcap-capture")]
    {
        let interface = config.interface.as_deref().unwrap_or("wlan0mon");
        let source = PcapCaptureSource::open_live(interface, 65535, 100).map_err(|err| AppError::Config {
            path: interface.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, err),
        })?;
        Ok(Box::new(source))
    }
    #[cfg(not(feature = "pcap-capture"))]
    {
        Ok(Box::new(SliceCaptureSource::new(Vec::new())))
    }
}
