// Fingerprint module - captured request descriptors and fingerprint dimensions

pub mod capture;
pub mod dimension;

pub use capture::{CapturedRequest, Http2Details, TlsDetails, HTTP2_NOT_NEGOTIATED};
pub use dimension::Dimension;
