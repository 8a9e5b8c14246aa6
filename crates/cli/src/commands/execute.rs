use agentry_core::{ComponentOutcome, ComponentRegistry, FlowExecutor, FlowReport};
use anyhow::Result;
use tracing::{info, warn};

use crate::output;

pub async fn run(registry: &ComponentRegistry, flow: &[String], params: &str, json_mode: bool) -> Result<()> {
    let report = FlowExecutor::new(registry).run(flow, params).await?;
    log_summary(&report);

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::print_header("Flow Results");
    output::print_flow_report(&report);
    println!();
    Ok(())
}

fn log_summary(report: &FlowReport) {
    if report.all_succeeded() {
        info!(components = report.runs.len(), "Flow completed");
    } else {
        let problems: Vec<&str> = report
            .runs
            .iter()
            .filter(|run| !matches!(run.outcome, ComponentOutcome::Succeeded { .. }))
            .map(|run| run.name.as_str())
            .collect();
        warn!(
            failed = report.failed(),
            not_found = report.not_found(),
            "Flow completed with problems in: {}",
            problems.join(", ")
        );
    }
}
