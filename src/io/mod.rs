pub mod config_io;
pub mod seed_io;

/// Error type for loading configuration and seed data
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not parse seed data: {0}")]
    SeedParseError(#[from] serde_json::Error),
}
