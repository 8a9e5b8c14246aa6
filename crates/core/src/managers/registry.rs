use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use agentry_shared::{Agent, AgentConfig, AgentRegistrar, OFFICIAL_SDK_SEAL, SDK_VERSION};

use super::catalog::AgentCatalog;
use super::manifest::Manifest;

pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

/// Why a component directory was left out of the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("No manifest found at {}", .0.display())]
    ManifestMissing(PathBuf),
    #[error("Failed to read manifest {}: {reason}", .path.display())]
    ManifestUnreadable { path: PathBuf, reason: String },
    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),
    #[error("Manifest is missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Module '{0}' is not linked into this build")]
    ModuleNotFound(String),
    #[error("Class '{class}' not found in module '{module}'")]
    ClassNotFound { module: String, class: String },
    #[error("Agent type '{class}' does not satisfy the agent contract: {reason}")]
    NotConformant { class: String, reason: String },
}

impl DiscoveryError {
    /// Malformed manifests and unresolvable modules are errors; everything
    /// else is a warning.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            DiscoveryError::ManifestUnreadable { .. }
                | DiscoveryError::MalformedManifest(_)
                | DiscoveryError::ModuleNotFound(_)
        )
    }
}

/// A component directory excluded during a scan.
#[derive(Debug, Clone)]
pub struct SkippedComponent {
    pub directory: PathBuf,
    pub reason: DiscoveryError,
}

/// A registered component: its manifest, the resolved agent type and the
/// configuration handed to every fresh instance.
#[derive(Debug, Clone)]
pub struct Registration {
    pub manifest: Manifest,
    pub registrar: AgentRegistrar,
    pub config: AgentConfig,
    pub directory: PathBuf,
}

impl Registration {
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Build a fresh agent instance.
    pub fn instantiate(&self) -> anyhow::Result<Box<dyn Agent>> {
        (self.registrar.factory)(self.config.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub manifest_file: String,
    /// Read `AGENTRY_<NAME>_<KEY>` overrides for declared config keys.
    pub env_overrides: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            env_overrides: true,
        }
    }
}

/// Name → component map built once from a components directory and only
/// read afterwards.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    root: PathBuf,
    components: HashMap<String, Registration>,
    skipped: Vec<SkippedComponent>,
}

impl ComponentRegistry {
    /// Scan `root` with default options.
    pub fn scan(root: impl AsRef<Path>, catalog: &AgentCatalog) -> Self {
        Self::scan_with(root, catalog, &ScanOptions::default())
    }

    /// Scan every immediate subdirectory of `root`. Never fails: components
    /// that cannot be loaded are logged and recorded in [`Self::skipped`].
    ///
    /// Directories are visited in name order and a later manifest reusing a
    /// name replaces the earlier registration.
    pub fn scan_with(root: impl AsRef<Path>, catalog: &AgentCatalog, options: &ScanOptions) -> Self {
        let root = root.as_ref();
        let mut registry = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };

        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                error!(root = %root.display(), error = %e, "❌ Cannot read components directory");
                return registry;
            }
        };

        let directories = component_directories(root, entries.map(|entry| entry.map(|e| e.path())));

        info!(root = %root.display(), count = directories.len(), "🔍 Scanning components");

        for directory in directories {
            match load_component(&directory, catalog, options) {
                Ok(registration) => {
                    let name = registration.name().to_string();
                    info!(
                        component = %name,
                        module = registration.registrar.module_path,
                        class = registration.registrar.class_name,
                        "✅ Registered component"
                    );
                    if let Some(previous) = registry.components.insert(name.clone(), registration) {
                        warn!(
                            component = %name,
                            replaced = %previous.directory.display(),
                            "⚠️ Duplicate component name, later manifest wins"
                        );
                    }
                }
                Err(reason) => {
                    if reason.is_error() {
                        error!(directory = %directory.display(), "❌ Skipping component: {}", reason);
                    } else {
                        warn!(directory = %directory.display(), "⚠️ Skipping component: {}", reason);
                    }
                    registry.skipped.push(SkippedComponent { directory, reason });
                }
            }
        }

        info!(
            registered = registry.components.len(),
            skipped = registry.skipped.len(),
            "Component scan finished"
        );
        registry
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registrations sorted by name.
    pub fn registrations(&self) -> Vec<&Registration> {
        let mut regs: Vec<&Registration> = self.components.values().collect();
        regs.sort_by(|a, b| a.name().cmp(b.name()));
        regs
    }

    pub fn skipped(&self) -> &[SkippedComponent] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Subdirectories among `entries`, sorted. Unreadable entries are logged and
/// left out.
fn component_directories(
    root: &Path,
    entries: impl IntoIterator<Item = std::io::Result<PathBuf>>,
) -> Vec<PathBuf> {
    let mut directories = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_dir() => directories.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(root = %root.display(), error = %e, "⚠️ Skipping unreadable directory entry");
            }
        }
    }
    directories.sort();
    directories
}

fn load_component(
    directory: &Path,
    catalog: &AgentCatalog,
    options: &ScanOptions,
) -> Result<Registration, DiscoveryError> {
    let manifest = Manifest::load(&directory.join(&options.manifest_file))?;
    let registrar = *catalog.resolve(&manifest.module_path, &manifest.class_name)?;
    verify_conformance(&registrar)?;

    let config = build_config(&manifest, &registrar, options.env_overrides);
    Ok(Registration {
        manifest,
        registrar,
        config,
        directory: directory.to_path_buf(),
    })
}

/// The trait bound is checked by the compiler; at runtime only the seal and
/// the SDK version the agent was built against remain to be verified.
pub fn verify_conformance(registrar: &AgentRegistrar) -> Result<(), DiscoveryError> {
    let not_conformant = |reason: String| DiscoveryError::NotConformant {
        class: registrar.class_name.to_string(),
        reason,
    };

    if registrar.sdk_seal != OFFICIAL_SDK_SEAL {
        return Err(not_conformant(format!(
            "registrar seal {:#010x} was not produced by #[agentry_agent]",
            registrar.sdk_seal
        )));
    }

    let requirement = semver::VersionReq::parse(&format!("^{}", registrar.sdk_version))
        .map_err(|e| not_conformant(format!("invalid SDK version '{}': {e}", registrar.sdk_version)))?;
    let harness = semver::Version::parse(SDK_VERSION)
        .map_err(|e| not_conformant(format!("invalid harness SDK version '{SDK_VERSION}': {e}")))?;
    if !requirement.matches(&harness) {
        return Err(not_conformant(format!(
            "built against SDK {} which is incompatible with {SDK_VERSION}",
            registrar.sdk_version
        )));
    }
    Ok(())
}

fn build_config(manifest: &Manifest, registrar: &AgentRegistrar, env_overrides: bool) -> AgentConfig {
    let mut config = AgentConfig::new(manifest.name.clone());
    config.config_values.extend(manifest.config.clone());

    if env_overrides {
        for key in registrar.config_keys {
            if let Ok(value) = std::env::var(config_env_var(&manifest.name, key)) {
                config.config_values.insert((*key).to_string(), value);
            }
        }
    }
    config
}

/// `AGENTRY_<NAME>_<KEY>`, upper-cased, with anything that is not
/// alphanumeric replaced by `_`.
pub fn config_env_var(component: &str, key: &str) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect()
    };
    format!("AGENTRY_{}_{}", sanitize(component), sanitize(key))
}
