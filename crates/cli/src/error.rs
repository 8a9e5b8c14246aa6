use agentry_core::ExecutorError;
use colored::Colorize;

/// Format an error for CLI display with contextual help messages.
pub fn display_error(err: &anyhow::Error) {
    if let Some(ExecutorError::InvalidParams(_)) = err.downcast_ref::<ExecutorError>() {
        eprintln!("  {} {err}", "ERROR".red().bold());
        eprintln!(
            "        Pass a JSON object, e.g. {}",
            r#"--params '{"city": "London"}'"#.dimmed()
        );
        return;
    }

    eprintln!("  {} {err}", "ERROR".red().bold());
    for cause in err.chain().skip(1) {
        eprintln!("        {} {cause}", "caused by:".dimmed());
    }
}
