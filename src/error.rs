//! Error type shared by every stage of a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvmError {
    #[error("width distribution not specified for particle pair ({first}, {second})")]
    MissingDistribution { first: String, second: String },

    #[error("strain index {index} out of range ({count} strains registered)")]
    UnknownStrain { index: usize, count: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("singular matrix in element assembly: {0}")]
    SingularMatrix(String),

    #[error("diagonalization failed: {0}")]
    Diagonalization(String),

    #[error("malformed basis file: {0}")]
    BasisFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SvmError>;
