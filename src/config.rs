use std::{env, path::PathBuf};

use crate::error::{EngineError, Result};

/// Extra directories prepended to the interpreter's `sys.path`, for RDKit
/// installs (usually a conda env) that the embedded python does not see.
pub const SITE_PACKAGES_VAR: &str = "CHEMENGINE_SITE_PACKAGES";

/// Whether RDKit keeps writing its own parse warnings to stderr.
pub const RDKIT_LOG_VAR: &str = "CHEMENGINE_RDKIT_LOG";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineConfig {
    pub site_packages: Vec<PathBuf>,
    pub rdkit_log: bool,
}

impl EngineConfig {
    /// Read the configuration from the process environment, after loading a
    /// `.env` file from the working directory (or a parent) if one exists.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_vars(
            env::var_os(SITE_PACKAGES_VAR),
            env::var(RDKIT_LOG_VAR).ok(),
        )
    }

    fn from_vars(
        site_packages: Option<std::ffi::OsString>,
        rdkit_log: Option<String>,
    ) -> Result<Self> {
        let site_packages = site_packages
            .map(|s| {
                env::split_paths(&s)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let rdkit_log = match rdkit_log {
            Some(v) => parse_flag(&v).ok_or_else(|| {
                EngineError::Config(format!(
                    "{RDKIT_LOG_VAR} must be a boolean, got {v:?}"
                ))
            })?,
            None => false,
        };
        Ok(Self {
            site_packages,
            rdkit_log,
        })
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
