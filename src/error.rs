use std::path::PathBuf;

use pyo3::PyErr;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid structure: unable to parse SMILES {smiles:?}")]
    InvalidStructure { smiles: String },

    #[error("failed to compute {descriptor} for {smiles:?}: {reason}")]
    Descriptor {
        descriptor: &'static str,
        smiles: String,
        reason: String,
    },

    #[error("malformed InChI key {0:?}")]
    InvalidInchiKey(String),

    #[error("RDKit unavailable: {0}")]
    Toolkit(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to load dataset '{path}': {source}", path = path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Python(#[from] PyErr),
}

impl EngineError {
    pub(crate) fn invalid_structure(smiles: &str) -> Self {
        Self::InvalidStructure {
            smiles: smiles.to_owned(),
        }
    }

    /// Returns `true` if the input SMILES could not be parsed.
    #[must_use]
    pub fn is_invalid_structure(&self) -> bool {
        matches!(self, Self::InvalidStructure { .. })
    }
}
