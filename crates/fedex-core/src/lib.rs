pub mod app_config;
pub mod config;
pub mod credentials;

pub use app_config::{FedexConfig, Mode};
pub use config::{load_fedex_config, load_fedex_config_from_env};
pub use credentials::Credentials;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
