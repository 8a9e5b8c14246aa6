use std::env;
use std::path::PathBuf;

use crate::managers::{ScanOptions, DEFAULT_MANIFEST_FILE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub components_dir: PathBuf,
    pub manifest_file: String,
    pub log_filter: String,
    /// Apply `AGENTRY_<NAME>_<KEY>` overrides to agent configuration.
    pub env_overrides: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("components"),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            log_filter: "info".to_string(),
            env_overrides: true,
        }
    }
}

impl HarnessConfig {
    pub fn load() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let components_dir = env::var("AGENTRY_COMPONENTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.components_dir);

        let manifest_file =
            env::var("AGENTRY_MANIFEST_FILE").unwrap_or(defaults.manifest_file);
        if manifest_file.is_empty()
            || manifest_file.contains(['/', '\\'])
            || manifest_file == "."
            || manifest_file == ".."
        {
            anyhow::bail!(
                "AGENTRY_MANIFEST_FILE must be a plain file name (got '{}')",
                manifest_file
            );
        }

        let log_filter = env::var("AGENTRY_LOG").unwrap_or(defaults.log_filter);

        let env_overrides = match env::var("AGENTRY_ENV_OVERRIDES") {
            Ok(v) => v.parse::<bool>().map_err(|_| {
                anyhow::anyhow!("Invalid AGENTRY_ENV_OVERRIDES value '{}': must be true or false", v)
            })?,
            Err(_) => defaults.env_overrides,
        };

        Ok(Self {
            components_dir,
            manifest_file,
            log_filter,
            env_overrides,
        })
    }

    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            manifest_file: self.manifest_file.clone(),
            env_overrides: self.env_overrides,
        }
    }
}
