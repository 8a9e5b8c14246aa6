mod catalog;
mod executor;
mod manifest;
mod registry;

pub use catalog::AgentCatalog;
pub use executor::{ComponentOutcome, ComponentRun, ExecutorError, FlowExecutor, FlowReport};
pub use manifest::Manifest;
pub use registry::{
    config_env_var, verify_conformance, ComponentRegistry, DiscoveryError, Registration,
    ScanOptions, SkippedComponent, DEFAULT_MANIFEST_FILE,
};
