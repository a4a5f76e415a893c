// Captured Request Descriptor
// The request description handed over by the capturing TLS/HTTP front end

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP/2 fingerprint recorded when the negotiated protocol is HTTP/1.1
pub const HTTP2_NOT_NEGOTIATED: &str = "-";

/// TLS-derived fingerprints of a captured request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TlsDetails {
    /// Full JA3 string (SSLVersion,Ciphers,Extensions,Curves,PointFormats)
    #[serde(default)]
    pub ja3: String,

    #[serde(default)]
    pub ja3_hash: String,

    /// Composite PeetPrint string
    #[serde(default)]
    pub peetprint: String,

    #[serde(default)]
    pub peetprint_hash: String,

    /// Remaining TLS fields, kept for the raw payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// HTTP/2 behaviour of a captured request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Http2Details {
    /// Akamai-format fingerprint (SETTINGS|WINDOW_UPDATE|PRIORITY|pseudo-headers)
    #[serde(default)]
    pub akamai_fingerprint: String,

    #[serde(default)]
    pub akamai_fingerprint_hash: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request descriptor produced by the capturing server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedRequest {
    /// Raw peer address, usually `host:port`
    #[serde(default)]
    pub ip: String,

    /// Negotiated protocol (`h2`, `http/1.1`, ...)
    #[serde(default)]
    pub http_version: String,

    /// Value of the User-Agent header
    #[serde(default)]
    pub user_agent: String,

    #[serde(default)]
    pub tls: TlsDetails,

    /// Present only when HTTP/2 was negotiated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http2: Option<Http2Details>,

    /// Everything else the capture carried
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CapturedRequest {
    /// Parse a descriptor from its JSON form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse either a single descriptor or a JSON array of descriptors
    pub fn many_from_json(json: &str) -> crate::Result<Vec<Self>> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(Into::into))
                .collect(),
            single => Ok(vec![serde_json::from_value(single)?]),
        }
    }

    /// HTTP/2 fingerprint to record for this request.
    ///
    /// `h2` yields the Akamai fingerprint, `http/1.1` yields the `-` sentinel
    /// and any other protocol leaves the value empty.
    pub fn http2_fingerprint(&self) -> String {
        match self.http_version.as_str() {
            "h2" => self
                .http2
                .as_ref()
                .map(|h2| h2.akamai_fingerprint.clone())
                .unwrap_or_default(),
            "http/1.1" => HTTP2_NOT_NEGOTIATED.to_string(),
            _ => String::new(),
        }
    }

    /// Serialize the full descriptor for verbatim storage
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
