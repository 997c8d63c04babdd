//! Molecule descriptors from SMILES strings. Parsing, canonicalization,
//! weights and InChI generation are all delegated to RDKit through an
//! embedded python interpreter; this crate validates the input and collects
//! the results.

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use serde::Deserialize;

pub mod config;
pub mod descriptors;
pub mod engine;
pub mod error;
mod rdkit;

pub use config::EngineConfig;
pub use descriptors::{DescriptorBundle, InchiKey};
pub use engine::ChemEngine;
pub use error::{EngineError, Result};

/// Average molecular weight of `smiles`, using the shared [ChemEngine]
pub fn molecular_weight(smiles: &str) -> Result<f64> {
    ChemEngine::global()?.molecular_weight(smiles)
}

/// All descriptors of `smiles`, using the shared [ChemEngine]
pub fn molecule_info(smiles: &str) -> Result<DescriptorBundle> {
    ChemEngine::global()?.molecule_info(smiles)
}

#[derive(Deserialize)]
struct Record {
    cmiles: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Layout {
    Entries {
        entries: HashMap<String, Vec<Record>>,
    },
    Smiles(Vec<String>),
}

/// A collection of input structures. Either a QCArchive-style export, with
/// records keyed by entry name, or a bare JSON array of SMILES
#[derive(Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    layout: Layout,
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let err = |e: Box<dyn std::error::Error + Send + Sync>| {
            EngineError::Dataset {
                path: path.to_owned(),
                source: e,
            }
        };
        let f = File::open(path).map_err(|e| err(e.into()))?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| err(e.into()))
    }

    /// consume `self` and return the contained SMILES strings, sorted and
    /// without duplicates
    pub fn to_smiles(self) -> Vec<String> {
        let mut ret: Vec<String> = match self.layout {
            Layout::Entries { entries } => entries
                .into_values()
                .flatten()
                .map(|v| v.cmiles)
                .collect(),
            Layout::Smiles(v) => v,
        };
        ret.sort();
        ret.dedup();
        ret
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn load_entries() {
        let f = write_tmp(
            r#"{"entries": {
                "ethanol": [{"cmiles": "CCO"}, {"cmiles": "CCO"}],
                "water": [{"cmiles": "O", "extra": 1}]
            }}"#,
        );
        let got = Dataset::load(f.path()).unwrap().to_smiles();
        assert_eq!(got, ["CCO", "O"]);
    }

    #[test]
    fn load_plain_list() {
        let f = write_tmp(r#"["c1ccccc1", "CCO", "c1ccccc1"]"#);
        let got = Dataset::load(f.path()).unwrap().to_smiles();
        assert_eq!(got, ["CCO", "c1ccccc1"]);
    }

    #[test]
    fn load_errors() {
        let err = Dataset::load("/definitely/not/here.json").err().unwrap();
        assert!(matches!(err, EngineError::Dataset { .. }));

        let f = write_tmp(r#"{"molecules": 3}"#);
        let err = Dataset::load(f.path()).err().unwrap();
        assert!(err.to_string().starts_with("failed to load dataset"));
    }
}
