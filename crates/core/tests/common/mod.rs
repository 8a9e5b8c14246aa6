#![allow(dead_code)]

pub mod logs;
pub mod test_agents;

use agentry_core::{AgentCatalog, ComponentRegistry, ScanOptions};
use std::path::Path;
use tempfile::TempDir;

/// Write `<root>/<dir>/manifest.json` with the given contents.
pub fn write_manifest(root: &Path, dir: &str, contents: &str) {
    let component_dir = root.join(dir);
    std::fs::create_dir_all(&component_dir).unwrap();
    std::fs::write(component_dir.join("manifest.json"), contents).unwrap();
}

/// Manifest JSON for a component backed by one of the test agents.
pub fn manifest(name: &str, class: &str) -> String {
    serde_json::json!({
        "name": name,
        "module_path": "test_agents",
        "class_name": class,
    })
    .to_string()
}

/// Temporary components directory holding the given `(name, class)` pairs,
/// one subdirectory per component named after it.
pub fn components_dir(components: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, class) in components {
        write_manifest(dir.path(), name, &manifest(name, class));
    }
    dir
}

/// Scan without environment overrides so tests stay independent of the
/// host environment.
pub fn scan(root: &Path) -> ComponentRegistry {
    let options = ScanOptions {
        env_overrides: false,
        ..ScanOptions::default()
    };
    ComponentRegistry::scan_with(root, &AgentCatalog::from_inventory(), &options)
}
