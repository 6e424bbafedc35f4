use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Name(#[from] tsheets_core::UnknownName),

    #[error("configuration error: {0}")]
    Config(#[from] tsheets_core::ConfigError),

    #[error(transparent)]
    Api(#[from] tsheets_core::ApiError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) | Self::Name(_) => 2,
            Self::Config(_) => 3,
            Self::Api(_) => 4,
            Self::Serialization(_) => 5,
            Self::Io(_) => 10,
        }
    }
}
