pub mod app_config;
pub mod config;
pub mod matcher;
pub mod types;

pub use app_config::{AppConfig, DEFAULT_TENANT_ID};
pub use config::{load_app_config, load_app_config_from_env};
pub use matcher::{closest_post, PostIndex};
pub use types::{NewEngagement, Person, Post, ENGAGEMENT_TYPE_REACTION, REACTION_TYPE_LIKE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
