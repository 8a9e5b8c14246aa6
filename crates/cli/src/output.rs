use agentry_core::{ComponentOutcome, FlowReport, Registration, SkippedComponent};
use agentry_shared::{AgentRegistrar, HealthReport};
use colored::Colorize;
use comfy_table::{presets::NOTHING, ContentArrangement, Table};

/// Print a decorated section header.
pub fn print_header(title: &str) {
    let line = "─".repeat(36);
    println!();
    println!("  {}", title.bold());
    println!("  {}", line.dimmed());
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_flow_report(report: &FlowReport) {
    if report.runs.is_empty() {
        println!("  {}", "Nothing to run.".dimmed());
        return;
    }

    let mut table = table();
    for run in &report.runs {
        let (dot, status, detail) = match &run.outcome {
            ComponentOutcome::Succeeded { result } => {
                ("●".green(), "succeeded".green(), result.to_string())
            }
            ComponentOutcome::Failed { error } => ("●".red(), "failed".red(), error.clone()),
            ComponentOutcome::NotFound => ("○".dimmed(), "not found".yellow(), String::new()),
        };
        table.add_row(vec![
            format!("  {dot}"),
            run.name.bold().to_string(),
            status.to_string(),
            format!("{}ms", run.elapsed_ms).dimmed().to_string(),
            detail,
        ]);
    }
    println!("{table}");

    println!(
        "\n  {} succeeded, {} failed, {} not found",
        report.succeeded().to_string().green(),
        report.failed().to_string().red(),
        report.not_found().to_string().yellow(),
    );
}

pub fn print_components_table(registrations: &[&Registration]) {
    if registrations.is_empty() {
        println!("  {}", "No components registered.".dimmed());
        return;
    }

    let mut table = table();
    for reg in registrations {
        let manifest = &reg.manifest;
        let version = manifest.version.as_deref().unwrap_or(reg.registrar.version);
        let description = manifest
            .description
            .as_deref()
            .unwrap_or(reg.registrar.description);
        table.add_row(vec![
            format!("  {}", "●".green()),
            manifest.name.clone().bold().to_string(),
            format!("{}::{}", manifest.module_path, manifest.class_name),
            version.to_string(),
            description.dimmed().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn print_agent_types_table(registrars: &[&AgentRegistrar]) {
    if registrars.is_empty() {
        println!("  {}", "No agent types linked.".dimmed());
        return;
    }

    let mut table = table();
    for registrar in registrars {
        table.add_row(vec![
            format!("  {}", "◆".cyan()),
            format!("{}::{}", registrar.module_path, registrar.class_name),
            registrar.version.to_string(),
            registrar.config_keys.join(", ").dimmed().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn print_skipped_table(skipped: &[SkippedComponent]) {
    let mut table = table();
    for skip in skipped {
        let dot = if skip.reason.is_error() { "○".red() } else { "○".yellow() };
        table.add_row(vec![
            format!("  {dot}"),
            skip.directory.display().to_string(),
            skip.reason.to_string().dimmed().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn print_health_table(reports: &[(String, HealthReport)]) {
    if reports.is_empty() {
        println!("  {}", "No components registered.".dimmed());
        return;
    }

    let mut table = table();
    for (name, report) in reports {
        let (dot, status) = if report.is_healthy() {
            ("●".green(), report.status.to_string().green())
        } else {
            ("●".red(), report.status.to_string().red())
        };
        table.add_row(vec![
            format!("  {dot}"),
            name.bold().to_string(),
            status.to_string(),
            report.message.dimmed().to_string(),
        ]);
    }
    println!("{table}");
}
