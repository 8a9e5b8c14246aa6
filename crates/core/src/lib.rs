//! Discovery and execution harness for agentry components.
//!
//! Components are agent types linked into the binary through
//! `#[agentry_agent]`. A components directory holds one `manifest.json` per
//! component naming the module and class to use; [`ComponentRegistry`] scans
//! it against the [`AgentCatalog`] and [`FlowExecutor`] runs named flows.

pub mod config;
pub mod managers;

pub use config::HarnessConfig;
pub use managers::{
    AgentCatalog, ComponentOutcome, ComponentRegistry, ComponentRun, DiscoveryError,
    ExecutorError, FlowExecutor, FlowReport, Manifest, Registration, ScanOptions,
    SkippedComponent,
};
