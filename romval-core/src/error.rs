use thiserror::Error;

/// Errors raised while loading or validating a [`PlatformConfig`](crate::PlatformConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read platform config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid platform config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("extension '{extension}' refers to unknown platform '{platform}'")]
    UnknownPlatform { extension: String, platform: String },

    #[error("extension '{0}' has no candidate platforms")]
    NoCandidates(String),

    #[error("platform '{0}' is declared more than once")]
    DuplicatePlatform(String),

    #[error("platform '{0}' has an empty alias")]
    EmptyAlias(String),
}
