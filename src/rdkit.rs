// all of the chemistry happens in RDKit, reached through the embedded python
// interpreter. this module owns the imported RDKit modules and the one place
// SMILES are turned into molecules
use pyo3::{
    prelude::PyAnyMethods,
    types::{PyList, PyListMethods, PyModule},
    Bound, Py, PyAny, PyResult, Python,
};
use tracing::{debug, warn};

use crate::{
    config::EngineConfig,
    descriptors::InchiKey,
    error::{EngineError, Result},
};

/// Handles to the RDKit modules, imported once per engine
pub(crate) struct Toolkit {
    chem: Py<PyModule>,
    descriptors: Py<PyModule>,
    mol_descriptors: Py<PyModule>,
    inchi: Py<PyModule>,
    version: String,
}

fn import<'py>(py: Python<'py>, name: &str) -> Result<Bound<'py, PyModule>> {
    PyModule::import_bound(py, name)
        .map_err(|e| EngineError::Toolkit(format!("cannot import {name}: {e}")))
}

impl Toolkit {
    pub(crate) fn load(py: Python<'_>, config: &EngineConfig) -> Result<Self> {
        let sys = py.import_bound("sys")?;
        let path = sys.getattr("path")?;
        let path = path.downcast::<PyList>().map_err(|e| {
            EngineError::Toolkit(format!("sys.path is not a list: {e}"))
        })?;
        // insert back to front so the first configured entry wins
        for dir in config.site_packages.iter().rev() {
            let dir = dir.to_string_lossy().into_owned();
            if !path.contains(dir.as_str())? {
                path.insert(0, dir.as_str())?;
                debug!("added {dir} to sys.path");
            }
        }

        let rdkit = import(py, "rdkit")?;
        let version: String = rdkit.getattr("__version__")?.extract()?;
        // the RDKit logger is process-wide, so apply the setting either way
        // rather than inheriting whatever an earlier engine chose
        let toggle = if config.rdkit_log {
            "EnableLog"
        } else {
            "DisableLog"
        };
        import(py, "rdkit.RDLogger")?.call_method1(toggle, ("rdApp.*",))?;

        Ok(Self {
            chem: import(py, "rdkit.Chem")?.unbind(),
            descriptors: import(py, "rdkit.Chem.Descriptors")?.unbind(),
            mol_descriptors: import(py, "rdkit.Chem.rdMolDescriptors")?
                .unbind(),
            inchi: import(py, "rdkit.Chem.inchi")?.unbind(),
            version,
        })
    }

    pub(crate) fn version(&self) -> &str {
        &self.version
    }

    /// The single parse-and-validate entry point. RDKit signals a bad SMILES
    /// by returning `None`, but it happily builds an empty molecule from
    /// blank input, so that is rejected here as well.
    pub(crate) fn parse<'py>(
        &self,
        py: Python<'py>,
        smiles: &str,
    ) -> Result<Molecule<'py>> {
        if smiles.trim().is_empty() {
            return Err(EngineError::invalid_structure(smiles));
        }
        let mol = self
            .chem
            .bind(py)
            .call_method1("MolFromSmiles", (smiles,))?;
        if mol.is_none() {
            debug!(smiles, "RDKit rejected SMILES");
            return Err(EngineError::invalid_structure(smiles));
        }
        let mol = Molecule {
            mol,
            input: smiles.to_owned(),
        };
        if mol.num_atoms()? == 0 {
            return Err(EngineError::invalid_structure(smiles));
        }
        debug!(smiles, "parsed molecule");
        Ok(mol)
    }
}

/// An RDKit `Mol`. Bound to the GIL, so it cannot outlive the call that
/// parsed it
pub(crate) struct Molecule<'py> {
    mol: Bound<'py, PyAny>,
    input: String,
}

impl<'py> Molecule<'py> {
    fn py(&self) -> Python<'py> {
        self.mol.py()
    }

    /// run one descriptor call, reporting any python exception as a failure
    /// of that descriptor rather than of the whole engine
    fn descriptor<T>(
        &self,
        name: &'static str,
        f: impl FnOnce() -> PyResult<T>,
    ) -> Result<T> {
        f().map_err(|e| {
            warn!(descriptor = name, smiles = %self.input, "{e}");
            EngineError::Descriptor {
                descriptor: name,
                smiles: self.input.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// like [Self::descriptor] for string results. RDKit's InChI functions
    /// log and return an empty string instead of raising
    fn non_empty(
        &self,
        name: &'static str,
        f: impl FnOnce() -> PyResult<String>,
    ) -> Result<String> {
        let s = self.descriptor(name, f)?;
        if s.is_empty() {
            warn!(descriptor = name, smiles = %self.input, "empty result");
            return Err(EngineError::Descriptor {
                descriptor: name,
                smiles: self.input.clone(),
                reason: "RDKit returned an empty result".to_owned(),
            });
        }
        Ok(s)
    }

    pub(crate) fn num_atoms(&self) -> Result<u32> {
        self.descriptor("num_atoms", || {
            self.mol.call_method0("GetNumAtoms")?.extract()
        })
    }

    pub(crate) fn canonical_smiles(&self, tk: &Toolkit) -> Result<String> {
        self.non_empty("smiles", || {
            tk.chem
                .bind(self.py())
                .call_method1("MolToSmiles", (&self.mol,))?
                .extract()
        })
    }

    pub(crate) fn inchi(&self, tk: &Toolkit) -> Result<String> {
        self.non_empty("inchi", || {
            tk.inchi
                .bind(self.py())
                .call_method1("MolToInchi", (&self.mol,))?
                .extract()
        })
    }

    pub(crate) fn inchikey(&self, tk: &Toolkit) -> Result<InchiKey> {
        self.non_empty("inchikey", || {
            tk.inchi
                .bind(self.py())
                .call_method1("MolToInchiKey", (&self.mol,))?
                .extract()
        })?
        .parse()
    }

    pub(crate) fn weight(&self, tk: &Toolkit) -> Result<f64> {
        self.descriptor("mol_weight", || {
            tk.descriptors
                .bind(self.py())
                .call_method1("MolWt", (&self.mol,))?
                .extract()
        })
    }

    pub(crate) fn formula(&self, tk: &Toolkit) -> Result<String> {
        self.non_empty("mol_formula", || {
            tk.mol_descriptors
                .bind(self.py())
                .call_method1("CalcMolFormula", (&self.mol,))?
                .extract()
        })
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn with_toolkit<R>(f: impl FnOnce(Python<'_>, &Toolkit) -> R) -> R {
        Python::with_gil(|py| {
            let tk = Toolkit::load(py, &EngineConfig::default()).unwrap();
            f(py, &tk)
        })
    }

    #[test]
    #[ignore = "requires RDKit"]
    #[serial]
    fn parse_rejects() {
        with_toolkit(|py, tk| {
            for bad in [
                "",
                "   ",
                "not_a_smiles",
                "C1CC",
                "invalid_smiles_string",
            ] {
                let err = tk.parse(py, bad).err().unwrap();
                assert!(err.is_invalid_structure(), "{bad:?}: {err}");
            }
        })
    }

    #[test]
    #[ignore = "requires RDKit"]
    #[serial]
    fn ethanol_descriptors() {
        with_toolkit(|py, tk| {
            let mol = tk.parse(py, "OCC").unwrap();
            assert_eq!(mol.num_atoms().unwrap(), 3);
            assert_eq!(mol.canonical_smiles(tk).unwrap(), "CCO");
            assert_eq!(mol.formula(tk).unwrap(), "C2H6O");
            assert!((mol.weight(tk).unwrap() - 46.07).abs() < 0.01);
            assert_eq!(
                mol.inchikey(tk).unwrap().as_str(),
                "LFQSCWFLJHTTHZ-UHFFFAOYSA-N"
            );
            assert!(mol.inchi(tk).unwrap().starts_with("InChI=1S/C2H6O/"));
        })
    }

    #[test]
    #[ignore = "requires RDKit"]
    #[serial]
    fn site_packages_prepended_once() {
        Python::with_gil(|py| {
            let config = EngineConfig {
                site_packages: vec!["/nonexistent/site-packages".into()],
                rdkit_log: false,
            };
            Toolkit::load(py, &config).unwrap();
            Toolkit::load(py, &config).unwrap();
            let path: Vec<String> = py
                .import_bound("sys")
                .unwrap()
                .getattr("path")
                .unwrap()
                .extract()
                .unwrap();
            assert_eq!(path[0], "/nonexistent/site-packages");
            assert_eq!(
                path.iter()
                    .filter(|p| *p == "/nonexistent/site-packages")
                    .count(),
                1
            );
        })
    }

    fn log_status(py: Python<'_>) -> String {
        py.import_bound("rdkit.rdBase")
            .unwrap()
            .call_method0("LogStatus")
            .unwrap()
            .extract()
            .unwrap()
    }

    #[test]
    #[ignore = "requires RDKit"]
    #[serial]
    fn later_engine_can_reenable_logging() {
        Python::with_gil(|py| {
            let quiet = EngineConfig::default();
            let loud = EngineConfig {
                rdkit_log: true,
                ..EngineConfig::default()
            };
            Toolkit::load(py, &quiet).unwrap();
            assert!(log_status(py).contains("rdApp.error:disabled"));
            Toolkit::load(py, &loud).unwrap();
            assert!(log_status(py).contains("rdApp.error:enabled"));
            Toolkit::load(py, &quiet).unwrap();
            assert!(log_status(py).contains("rdApp.error:disabled"));
        })
    }
}
