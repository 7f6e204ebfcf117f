use chrono::FixedOffset;

use crate::credentials::Credentials;

const PRODUCTION_ENDPOINT: &str = "https://ws.fedex.com:443/web-services";
const TEST_ENDPOINT: &str = "https://wsbeta.fedex.com:443/web-services";

/// Which FedEx web-services environment requests are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Test,
}

impl Mode {
    /// Default endpoint for this environment.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Mode::Production => PRODUCTION_ENDPOINT,
            Mode::Test => TEST_ENDPOINT,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Production => write!(f, "production"),
            Mode::Test => write!(f, "test"),
        }
    }
}

/// `Debug` output is safe to log: [`Credentials`] redacts its own secrets.
#[derive(Debug, Clone)]
pub struct FedexConfig {
    pub credentials: Credentials,
    pub mode: Mode,
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Zone every request date (`EffectiveDate`, `ShipDate`) is rendered in.
    pub reference_offset: FixedOffset,
    /// Emit full request XML and raw reply bodies at `debug` level.
    pub debug: bool,
    pub log_level: String,
}
