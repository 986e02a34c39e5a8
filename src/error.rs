//! Crate-wide error types beyond the per-parser `ParseError`s in
//! `radiotap.rs` and `beacon.rs`.

use thiserror::Error;

/// Used only to carry structured detail for the "unknown subtype" diagnostic
/// — classification itself never fails (spec.md §8 invariant 2: dispatch is
/// total), so this is never returned from `FrameClassifier::classify`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("frame control nibble {0:#x} did not map to a known subtype")]
    UnknownSubtype(u8),
}

/// Internal reasons `convert_to_ethernet` produces an empty result.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConvertError {
    #[error("802.11 header is shorter than the minimum required for conversion")]
    FrameTooShort,
    #[error("data subtype carries no convertible payload")]
    NonConvertibleSubtype,
}

/// Binary-level error type: capture I/O, sink I/O, and config loading.
/// Unlike the core's non-fatal policy (spec.md §7), these are fatal to the
/// driver loop — there is nothing core-internal left for them to corrupt.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("capture source error: {0}")]
    Capture(#[from] std::io::Error),
    #[error("failed to load config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
