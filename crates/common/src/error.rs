use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An abstract operation was invoked on a type that does not provide it.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("Broker refused command: {0}")]
    Broker(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
