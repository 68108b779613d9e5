use thiserror::Error;

/// CLI-level errors, mapped to process exit codes in `main`.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] thinqlink_config::ConfigError),

    #[error(transparent)]
    Api(#[from] thinqlink_api::Error),

    #[error(transparent)]
    Set(#[from] thinqlink_core::SetError),

    #[error("unknown capability `{name}` (try `active`, `rotation-speed`, `target-state`, ...)")]
    UnknownCapability { name: String },

    #[error("invalid value `{value}`: expected on/off, an integer, or a decimal number")]
    InvalidValue { value: String },

    #[error("no device with id `{device}` (see `thinqlink devices`)")]
    NoSuchDevice { device: String },

    #[error("timed out waiting for the first device snapshot")]
    SnapshotTimeout,
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::UnknownCapability { .. } | Self::InvalidValue { .. } => 2,
            _ => 1,
        }
    }
}
