use pyo3::{sync::GILOnceCell, Python};
use tracing::{info, instrument};

use crate::{
    config::EngineConfig,
    descriptors::DescriptorBundle,
    error::Result,
    rdkit::Toolkit,
};

static GLOBAL: GILOnceCell<ChemEngine> = GILOnceCell::new();

/// Computes molecule descriptors from SMILES strings by delegating to RDKit.
/// Every call is independent: the parsed molecule is dropped before the call
/// returns.
pub struct ChemEngine {
    toolkit: Toolkit,
}

impl ChemEngine {
    /// Initialize with the default configuration, using whatever RDKit the
    /// embedded interpreter can already import
    pub fn new() -> Result<Self> {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        Python::with_gil(|py| Self::load(py, config))
    }

    fn load(py: Python<'_>, config: &EngineConfig) -> Result<Self> {
        let toolkit = Toolkit::load(py, config)?;
        info!("initialized RDKit {}", toolkit.version());
        Ok(Self { toolkit })
    }

    /// The process-wide engine behind [crate::molecular_weight] and
    /// [crate::molecule_info], configured from the environment on first use.
    /// A failed initialization is retried on the next call.
    pub fn global() -> Result<&'static Self> {
        Python::with_gil(|py| {
            GLOBAL.get_or_try_init(py, || {
                let config = EngineConfig::from_env()?;
                Self::load(py, &config)
            })
        })
    }

    pub fn toolkit_version(&self) -> &str {
        self.toolkit.version()
    }

    /// Average molecular weight of `smiles` in g/mol
    #[instrument(level = "debug", skip(self))]
    pub fn molecular_weight(&self, smiles: &str) -> Result<f64> {
        Python::with_gil(|py| {
            let mol = self.toolkit.parse(py, smiles)?;
            mol.weight(&self.toolkit)
        })
    }

    /// Parse `smiles` and collect the full [DescriptorBundle]. Fails before
    /// building anything if the structure is invalid or any descriptor
    /// cannot be computed.
    #[instrument(level = "debug", skip(self))]
    pub fn molecule_info(&self, smiles: &str) -> Result<DescriptorBundle> {
        Python::with_gil(|py| {
            let tk = &self.toolkit;
            let mol = tk.parse(py, smiles)?;
            Ok(DescriptorBundle {
                smiles: mol.canonical_smiles(tk)?,
                inchi: mol.inchi(tk)?,
                inchikey: mol.inchikey(tk)?,
                num_atoms: mol.num_atoms()?,
                mol_weight: mol.weight(tk)?,
                mol_formula: mol.formula(tk)?,
            })
        })
    }

    /// [Self::molecule_info] for each input in order. One bad SMILES does not
    /// stop the rest
    pub fn molecule_info_batch<I, S>(
        &self,
        smiles: I,
    ) -> Vec<Result<DescriptorBundle>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        smiles
            .into_iter()
            .map(|s| self.molecule_info(s.as_ref()))
            .collect()
    }
}
