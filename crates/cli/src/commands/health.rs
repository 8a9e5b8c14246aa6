use agentry_core::{ComponentRegistry, FlowExecutor};
use anyhow::Result;
use serde_json::json;

use crate::output;

pub async fn run(registry: &ComponentRegistry, names: &[String], json_mode: bool) -> Result<()> {
    let executor = FlowExecutor::new(registry);
    let reports = if names.is_empty() {
        executor.health_all().await
    } else {
        executor.health(names).await
    };

    if json_mode {
        let data: Vec<_> = reports
            .iter()
            .map(|(name, report)| {
                json!({
                    "name": name,
                    "status": report.status,
                    "message": report.message,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    output::print_header("Component Health");
    output::print_health_table(&reports);
    println!();
    Ok(())
}
