//! Error types for MDS

use thiserror::Error;

/// Main error type for MDS operations
#[derive(Error, Debug)]
pub enum MdsError {
    /// A step separator carries an identifier outside `[a-z0-9-]`
    #[error(
        "Invalid step ID \"{id}\" at line {line}. Step IDs must only contain lowercase letters (a-z), numbers (0-9), and hyphens (-)."
    )]
    InvalidStepId { id: String, line: usize },

    /// The same step identifier was declared twice
    #[error("Duplicate step ID \"{id}\" at line {line} (first defined at line {first_line}).")]
    DuplicateStepId {
        id: String,
        line: usize,
        first_line: usize,
    },

    /// A data block body is not valid YAML
    #[error("Failed to decode `{header}` block: {source}")]
    Decode {
        header: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MdsError {
    /// Source line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            MdsError::InvalidStepId { line, .. } | MdsError::DuplicateStepId { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}

/// Result type alias for MDS operations
pub type Result<T> = std::result::Result<T, MdsError>;
