//! Descriptor records handed back to callers

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Block lengths of a standard InChI key: 14-character connectivity hash,
/// 10-character stereo/isotope hash plus flags, 1-character protonation flag
const INCHIKEY_BLOCKS: [usize; 3] = [14, 10, 1];

/// A hashed InChI identifier in its standard `XXXXXXXXXXXXXX-XXXXXXXXXX-X`
/// form. Parsing upper-cases the input before checking it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InchiKey(String);

impl InchiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first block, which only depends on the molecular skeleton
    pub fn connectivity(&self) -> &str {
        &self.0[..INCHIKEY_BLOCKS[0]]
    }
}

impl FromStr for InchiKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase();
        let blocks: Vec<&str> = key.split('-').collect();
        let well_formed = blocks.len() == INCHIKEY_BLOCKS.len()
            && blocks.iter().zip(INCHIKEY_BLOCKS).all(|(b, n)| {
                b.len() == n
                    && b.chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            });
        if !well_formed {
            return Err(EngineError::InvalidInchiKey(s.to_owned()));
        }
        Ok(Self(key))
    }
}

impl TryFrom<String> for InchiKey {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InchiKey> for String {
    fn from(value: InchiKey) -> Self {
        value.0
    }
}

impl fmt::Display for InchiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything [crate::ChemEngine::molecule_info] reports about one molecule.
/// Serializes with exactly these field names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DescriptorBundle {
    /// canonical SMILES
    pub smiles: String,
    /// standard InChI
    pub inchi: String,
    pub inchikey: InchiKey,
    /// atoms in the parsed graph; hydrogens are implicit unless written in
    /// brackets, so this is normally the heavy atom count
    pub num_atoms: u32,
    /// average molecular weight in g/mol
    pub mol_weight: f64,
    /// Hill-order formula
    pub mol_formula: String,
}

impl DescriptorBundle {
    /// Two bundles describe the same compound when their InChI keys agree
    pub fn is_same(&self, other: &Self) -> bool {
        self.inchikey == other.inchikey
    }
}

impl fmt::Display for DescriptorBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.3} g/mol ({} atoms) {}",
            self.smiles,
            self.mol_formula,
            self.mol_weight,
            self.num_atoms,
            self.inchikey
        )
    }
}
