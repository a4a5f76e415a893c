// Correlation lookup arguments
// Licensed under GPL-3.0

use crate::fingerprint::Dimension;
use clap::Args;

/// One-shot correlation lookups against the record store
///
/// At most one `--by-*` flag may be given per invocation.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Look up by TLS (JA3) fingerprint
    #[arg(long = "by-ja3", value_name = "JA3")]
    pub ja3: Option<String>,

    /// Look up by HTTP/2 fingerprint
    #[arg(long = "by-h2", value_name = "FINGERPRINT")]
    pub h2: Option<String>,

    /// Look up by composite (PeetPrint) fingerprint
    #[arg(long = "by-peetprint", value_name = "PEETPRINT")]
    pub peetprint: Option<String>,

    /// Look up by user-agent (percent-encoded values are decoded)
    #[arg(long = "by-user-agent", value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Print the number of stored observations
    #[arg(long = "count")]
    pub count: bool,

    /// Entries per frequency map (overrides the config file)
    #[arg(long = "top-k", value_name = "K")]
    pub top_k: Option<usize>,
}

impl QueryArgs {
    /// Every requested lookup as (dimension, value)
    pub fn lookups(&self) -> Vec<(Dimension, &str)> {
        [
            (Dimension::Tls, &self.ja3),
            (Dimension::Http2, &self.h2),
            (Dimension::Composite, &self.peetprint),
            (Dimension::UserAgent, &self.user_agent),
        ]
        .into_iter()
        .filter_map(|(dimension, value)| value.as_deref().map(|v| (dimension, v)))
        .collect()
    }

    /// The requested lookup, if any
    pub fn lookup(&self) -> Option<(Dimension, &str)> {
        self.lookups().into_iter().next()
    }
}
