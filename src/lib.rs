// fpscope - Client network-fingerprint correlation engine
// Licensed under GPL-3.0

//! fpscope records observed client fingerprints (JA3-style TLS fingerprint,
//! HTTP/2 behavioral fingerprint, composite fingerprint and the declared
//! user-agent) and answers cross-tabulation queries over them: given one
//! dimension's value, which values co-occur most often in the others.

pub mod api;
pub mod cli;
pub mod correlation;
pub mod db;
pub mod error;
pub mod fingerprint;
pub mod ingest;

// Re-export commonly used types
pub use crate::cli::Args;
pub use crate::correlation::{Correlation, CorrelationEngine, RankedCounts};
pub use crate::error::CorrelationError;
pub use crate::fingerprint::{CapturedRequest, Dimension};
pub use crate::ingest::{IngestOutcome, ObservationIngestor};

/// Result type for fpscope operations
pub type Result<T> = std::result::Result<T, CorrelationError>;
