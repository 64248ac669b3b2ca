use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("observation {id}: expected 3 equation coefficients, got {len}")]
    MalformedCoefficients { id: String, len: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Yaml Error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
