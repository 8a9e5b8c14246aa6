use agentry_core::{AgentCatalog, ComponentRegistry};
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::output;

pub fn run(catalog: &AgentCatalog, registry: &ComponentRegistry, json_mode: bool) -> Result<()> {
    let registrations = registry.registrations();

    if json_mode {
        let components: Vec<_> = registrations
            .iter()
            .map(|reg| {
                json!({
                    "name": reg.name(),
                    "module_path": reg.manifest.module_path,
                    "class_name": reg.manifest.class_name,
                    "description": reg.manifest.description.as_deref().unwrap_or(reg.registrar.description),
                    "version": reg.manifest.version.as_deref().unwrap_or(reg.registrar.version),
                    "directory": reg.directory.display().to_string(),
                })
            })
            .collect();
        let skipped: Vec<_> = registry
            .skipped()
            .iter()
            .map(|s| {
                json!({
                    "directory": s.directory.display().to_string(),
                    "reason": s.reason.to_string(),
                })
            })
            .collect();
        let agent_types: Vec<_> = catalog
            .registrars()
            .iter()
            .map(|r| {
                json!({
                    "module_path": r.module_path,
                    "class_name": r.class_name,
                    "version": r.version,
                    "config_keys": r.config_keys,
                })
            })
            .collect();
        let data = json!({
            "root": registry.root().display().to_string(),
            "components": components,
            "skipped": skipped,
            "agent_types": agent_types,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    output::print_header("Registered Components");
    println!("  {}  {}", "Root:".dimmed(), registry.root().display());
    output::print_components_table(&registrations);

    output::print_header("Linked Agent Types");
    output::print_agent_types_table(&catalog.registrars());

    if !registry.skipped().is_empty() {
        output::print_header("Skipped");
        output::print_skipped_table(registry.skipped());
    }
    println!();
    Ok(())
}
