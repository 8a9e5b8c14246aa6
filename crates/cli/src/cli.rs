use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "agentry",
    about = "Agentry: discover and run agent components",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Output raw JSON (for scripting/piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Components directory (overrides AGENTRY_COMPONENTS_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub components_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run components in order with one shared parameter set
    Execute {
        /// Component names, in execution order
        #[arg(required = true)]
        flow: Vec<String>,
        /// Parameters as a JSON object
        #[arg(short, long, default_value = "")]
        params: String,
    },

    /// List discovered components and skipped directories
    List,

    /// Run health checks (all components when no name is given)
    Health {
        /// Component names
        names: Vec<String>,
    },
}
