// Fingerprint Dimensions
// The four axes an observation is recorded and cross-tabulated along

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// One fingerprint dimension of an observation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// JA3-style TLS handshake fingerprint
    Tls,

    /// Akamai-style HTTP/2 SETTINGS/priority fingerprint
    Http2,

    /// Composite (PeetPrint) fingerprint
    Composite,

    /// Declared User-Agent header
    UserAgent,
}

impl Dimension {
    /// All dimensions in storage column order
    pub const ALL: [Dimension; 4] = [
        Dimension::Tls,
        Dimension::Http2,
        Dimension::Composite,
        Dimension::UserAgent,
    ];

    /// Column holding this dimension in the `observations` table.
    ///
    /// Only these fixed names are ever interpolated into SQL.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Tls => "tls_fingerprint",
            Dimension::Http2 => "http2_fingerprint",
            Dimension::Composite => "composite_fingerprint",
            Dimension::UserAgent => "user_agent",
        }
    }

    /// Short name used in routes and on the command line
    pub fn slug(self) -> &'static str {
        match self {
            Dimension::Tls => "ja3",
            Dimension::Http2 => "h2",
            Dimension::Composite => "peetprint",
            Dimension::UserAgent => "user-agent",
        }
    }

    /// Response key for the queried value
    pub fn value_key(self) -> &'static str {
        match self {
            Dimension::Tls => "ja3",
            Dimension::Http2 => "h2_fp",
            Dimension::Composite => "peet_print",
            Dimension::UserAgent => "useragent",
        }
    }

    /// Response key for this dimension's frequency map
    pub fn counts_key(self) -> &'static str {
        match self {
            Dimension::Tls => "ja3s",
            Dimension::Http2 => "h2_fps",
            Dimension::Composite => "peet_prints",
            Dimension::UserAgent => "user_agents",
        }
    }

    /// The three dimensions other than `self`, in storage column order
    pub fn others(self) -> [Dimension; 3] {
        let mut out = [Dimension::Tls; 3];
        let mut i = 0;
        for dimension in Self::ALL {
            if dimension != self {
                out[i] = dimension;
                i += 1;
            }
        }
        out
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Dimension {
    type Err = crate::CorrelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ja3" | "tls" => Ok(Dimension::Tls),
            "h2" | "http2" => Ok(Dimension::Http2),
            "peetprint" | "peet_print" | "composite" => Ok(Dimension::Composite),
            "user-agent" | "user_agent" | "useragent" | "ua" => Ok(Dimension::UserAgent),
            other => Err(crate::CorrelationError::InvalidInput {
                message: format!("unknown fingerprint dimension: {}", other),
            }),
        }
    }
}
