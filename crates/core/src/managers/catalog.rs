use std::collections::HashMap;
use tracing::{debug, info, warn};

use agentry_shared::AgentRegistrar;

use super::DiscoveryError;

/// Every agent type linked into the binary, keyed by module path and then
/// class name. Manifests are resolved against this instead of importing
/// code at runtime.
#[derive(Debug, Default, Clone)]
pub struct AgentCatalog {
    modules: HashMap<String, HashMap<String, AgentRegistrar>>,
}

impl AgentCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect all registrars submitted through `#[agentry_agent]`.
    #[must_use]
    pub fn from_inventory() -> Self {
        info!("🔍 Scanning for agent types via inventory...");

        let mut catalog = Self::new();
        for registrar in agentry_shared::inventory::iter::<AgentRegistrar> {
            debug!(
                module = registrar.module_path,
                class = registrar.class_name,
                "📦 Discovered agent type"
            );
            catalog.register(*registrar);
        }

        if catalog.is_empty() {
            warn!("⚠️ No agent types discovered. Agent crates must be linked into the binary.");
        } else {
            info!("✅ Discovered {} agent type(s)", catalog.len());
        }
        catalog
    }

    /// Add a registrar. A second registrar for the same module and class
    /// replaces the first.
    pub fn register(&mut self, registrar: AgentRegistrar) {
        let classes = self.modules.entry(registrar.module_path.to_string()).or_default();
        if classes
            .insert(registrar.class_name.to_string(), registrar)
            .is_some()
        {
            warn!(
                module = registrar.module_path,
                class = registrar.class_name,
                "Duplicate agent registrar replaced"
            );
        }
    }

    /// Resolve a manifest's module path and class name to a registrar.
    pub fn resolve(&self, module_path: &str, class_name: &str) -> Result<&AgentRegistrar, DiscoveryError> {
        let classes = self
            .modules
            .get(module_path)
            .ok_or_else(|| DiscoveryError::ModuleNotFound(module_path.to_string()))?;
        classes.get(class_name).ok_or_else(|| DiscoveryError::ClassNotFound {
            module: module_path.to_string(),
            class: class_name.to_string(),
        })
    }

    /// Number of registered agent types.
    pub fn len(&self) -> usize {
        self.modules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registrars sorted by module path, then class name.
    pub fn registrars(&self) -> Vec<&AgentRegistrar> {
        let mut registrars: Vec<&AgentRegistrar> =
            self.modules.values().flat_map(HashMap::values).collect();
        registrars.sort_by_key(|r| (r.module_path, r.class_name));
        registrars
    }
}
