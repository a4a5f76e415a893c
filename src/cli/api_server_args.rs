// REST API server configuration arguments
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

/// REST API server configuration
///
/// Host/port binding for the lookup and ingestion endpoints, plus the
/// optional TOML file carrying API keys and CORS settings.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiServerArgs {
    /// Start REST API server mode
    #[arg(long = "serve", id = "api_enable")]
    pub enable: bool,

    /// API server host address (overrides the config file)
    #[arg(long = "api-host", value_name = "HOST", id = "api_host")]
    pub host: Option<String>,

    /// API server port (overrides the config file)
    #[arg(long = "api-port", value_name = "PORT", id = "api_port")]
    pub port: Option<u16>,

    /// API configuration file (TOML format)
    #[arg(long = "api-config", value_name = "FILE", id = "api_config")]
    pub config: Option<PathBuf>,

    /// Disable Swagger UI documentation
    #[arg(long = "api-no-swagger")]
    pub no_swagger: bool,

    /// Generate example API configuration file
    #[arg(
        long = "api-config-example",
        value_name = "FILE",
        id = "api_config_example"
    )]
    pub config_example: Option<PathBuf>,
}
