//! Monitor-mode 802.11 frame handler: parses captured frames, applies
//! MAC/SSID filtering and BSSID locking, converts accepted Data frames to
//! Ethernet II, and builds the Acknowledgement/Ad-Hoc Data frames sent back
//! out the monitor interface.
//!
//! The crate is organized around the receive-side state machine in
//! [`filter`], backed by standalone parsers (`radiotap`, `classify`,
//! `beacon`, `mac`) and outbound construction (`builder`). `capture`,
//! `sink`, `config`, `diagnostics`, and `app` are the ambient layer that
//! wires the core into a running process.

pub mod app;
pub mod beacon;
pub mod builder;
pub mod capture;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod mac;
pub mod radiotap;
pub mod sink;
