use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info, warn};

use agentry_shared::{HealthReport, Params, ParamsError};

use super::registry::{ComponentRegistry, Registration};

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] ParamsError),
}

/// Outcome of one component invocation inside a flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComponentOutcome {
    Succeeded { result: serde_json::Value },
    Failed { error: String },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRun {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ComponentOutcome,
    pub elapsed_ms: u64,
}

/// Per-component outcomes in flow order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowReport {
    pub runs: Vec<ComponentRun>,
}

impl FlowReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, ComponentOutcome::Succeeded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ComponentOutcome::Failed { .. }))
    }

    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, ComponentOutcome::NotFound))
    }

    /// True when every component in the flow succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == self.runs.len()
    }

    /// First run of `name`, if it appeared in the flow.
    pub fn get(&self, name: &str) -> Option<&ComponentRun> {
        self.runs.iter().find(|r| r.name == name)
    }

    fn count(&self, pred: impl Fn(&ComponentOutcome) -> bool) -> usize {
        self.runs.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Runs flows against a registry, one component at a time.
pub struct FlowExecutor<'a> {
    registry: &'a ComponentRegistry,
}

impl<'a> FlowExecutor<'a> {
    #[must_use]
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Parse `params` once and run `flow` in order.
    ///
    /// Only a malformed parameter string is reported as an error, before
    /// any component runs. Component failures end up in the report.
    pub async fn run<I, S>(&self, flow: I, params: &str) -> Result<FlowReport, ExecutorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let params = Params::parse(params)?;
        Ok(self.run_with(flow, &params).await)
    }

    /// Run `flow` in order with an already parsed parameter set.
    pub async fn run_with<I, S>(&self, flow: I, params: &Params) -> FlowReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = FlowReport::default();
        for name in flow {
            let name = name.as_ref();
            let started = Instant::now();
            let outcome = self.run_component(name, params).await;
            report.runs.push(ComponentRun {
                name: name.to_string(),
                outcome,
                elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            });
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            not_found = report.not_found(),
            "Flow finished"
        );
        report
    }

    async fn run_component(&self, name: &str, params: &Params) -> ComponentOutcome {
        let Some(registration) = self.registry.get(name) else {
            warn!(component = %name, "Component {} not found, skipping", name);
            return ComponentOutcome::NotFound;
        };

        let agent = match instantiate(registration) {
            Ok(agent) => agent,
            Err(message) => {
                error!(component = %name, error = %message, "❌ Failed to instantiate component");
                return ComponentOutcome::Failed { error: message };
            }
        };

        info!(component = %name, "▶️ Executing {}...", name);
        match AssertUnwindSafe(agent.execute(params)).catch_unwind().await {
            Ok(Ok(result)) => {
                info!(component = %name, result = %result, "✅ Result from {}", name);
                ComponentOutcome::Succeeded { result }
            }
            Ok(Err(e)) => {
                let message = format!("{e:#}");
                error!(component = %name, error = %message, "❌ Error executing {}", name);
                ComponentOutcome::Failed { error: message }
            }
            Err(panic) => {
                let message = format!("panicked: {}", panic_message(panic.as_ref()));
                error!(component = %name, error = %message, "🔥 Component {} panicked", name);
                ComponentOutcome::Failed { error: message }
            }
        }
    }

    /// Health-check the named components. Unknown names are reported as
    /// unhealthy.
    pub async fn health<I, S>(&self, names: I) -> Vec<(String, HealthReport)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut reports = Vec::new();
        for name in names {
            let name = name.as_ref();
            let report = match self.registry.get(name) {
                Some(registration) => check_health(registration).await,
                None => HealthReport::unhealthy(format!("Component '{name}' not found")),
            };
            if report.is_healthy() {
                info!(component = %name, message = %report.message, "💚 Healthy");
            } else {
                warn!(component = %name, message = %report.message, "💔 Unhealthy");
            }
            reports.push((name.to_string(), report));
        }
        reports
    }

    /// Health-check every registered component, in name order.
    pub async fn health_all(&self) -> Vec<(String, HealthReport)> {
        self.health(self.registry.names()).await
    }
}

fn instantiate(registration: &Registration) -> Result<Box<dyn agentry_shared::Agent>, String> {
    match std::panic::catch_unwind(AssertUnwindSafe(|| registration.instantiate())) {
        Ok(Ok(agent)) => Ok(agent),
        Ok(Err(e)) => Err(format!("{e:#}")),
        Err(panic) => Err(format!("panicked during construction: {}", panic_message(panic.as_ref()))),
    }
}

async fn check_health(registration: &Registration) -> HealthReport {
    let agent = match instantiate(registration) {
        Ok(agent) => agent,
        Err(message) => return HealthReport::unhealthy(message),
    };
    match AssertUnwindSafe(agent.health_check()).catch_unwind().await {
        Ok(report) => report,
        Err(panic) => HealthReport::unhealthy(format!("health check panicked: {}", panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
