// Ingestion Filter
// Decides which captured requests are eligible for storage

use crate::db::models::Observation;
use std::net::SocketAddr;

/// Case-insensitive substrings identifying scripting and automation clients
pub const PROHIBITED_SUBSTRINGS: &[&str] = &[
    "curl", "telegram", "python", "go", "java", "php", "node", "wget", "ruby", "perl", "c++",
    "swift", "kotlin", "rust",
];

/// Substring that admits a user-agent regardless of any prohibited match
pub const ADMIT_OVERRIDE: &str = "okhttp";

/// Outcome of evaluating a declared user-agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// No prohibited substring matched
    Admitted,

    /// Contains the override substring; prohibited substrings were not consulted
    AdmittedByOverride,

    /// Empty user-agent
    RejectedEmpty,

    /// Matched the given prohibited substring
    RejectedProhibited(&'static str),
}

impl AdmissionDecision {
    /// Whether the observation may be stored
    pub fn is_admitted(self) -> bool {
        matches!(
            self,
            AdmissionDecision::Admitted | AdmissionDecision::AdmittedByOverride
        )
    }
}

/// User-agent based admission policy
#[derive(Debug, Clone, Default)]
pub struct IngestionFilter {
    log_source_addresses: bool,
}

impl IngestionFilter {
    /// Create filter; `log_source_addresses` mirrors the `log_ips` setting
    pub fn new(log_source_addresses: bool) -> Self {
        Self {
            log_source_addresses,
        }
    }

    /// Whether admitted observations carry their source address
    pub fn logs_source_addresses(&self) -> bool {
        self.log_source_addresses
    }

    /// Classify a declared user-agent
    pub fn evaluate(&self, user_agent: &str) -> AdmissionDecision {
        if user_agent.is_empty() {
            return AdmissionDecision::RejectedEmpty;
        }

        let lower = user_agent.to_lowercase();
        if lower.contains(ADMIT_OVERRIDE) {
            return AdmissionDecision::AdmittedByOverride;
        }

        match PROHIBITED_SUBSTRINGS
            .iter()
            .find(|substring| lower.contains(*substring))
        {
            Some(substring) => AdmissionDecision::RejectedProhibited(substring),
            None => AdmissionDecision::Admitted,
        }
    }

    /// Decide admission and, when admitted, attach the port-stripped source
    /// address if address logging is enabled. A rejected observation is left
    /// untouched.
    pub fn admit(
        &self,
        observation: &mut Observation,
        user_agent: &str,
        raw_address: &str,
    ) -> AdmissionDecision {
        let decision = self.evaluate(user_agent);

        if decision.is_admitted() {
            observation.source_address = if self.log_source_addresses {
                Some(strip_port(raw_address))
            } else {
                None
            };
        }

        decision
    }
}

/// Remove a trailing `:port` from a peer address.
///
/// Socket addresses (including bracketed IPv6) yield their IP; otherwise a
/// trailing all-digit component after the last `:` is dropped. Addresses
/// without a port are returned unchanged.
pub fn strip_port(address: &str) -> String {
    if let Ok(socket) = address.parse::<SocketAddr>() {
        return socket.ip().to_string();
    }

    match address.rsplit_once(':') {
        Some((host, port))
            if !host.is_empty()
                && !host.contains(':')
                && !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            host.to_string()
        }
        _ => address.to_string(),
    }
}
