//! tether CLI library

pub mod commands;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use commands::ClusterArgs;

/// tether - run manager-cluster jobs on worker clusters
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the remote copy of a job or pull its status back
    Sync(commands::sync::SyncArgs),
    /// Delete the remote copy of a job
    Delete(commands::delete::DeleteArgs),
    /// Report whether a job is handed to the multi-cluster controller
    Managed(commands::managed::ManagedArgs),
    /// List remote copies whose manager job is gone
    Orphans(commands::orphans::OrphansArgs),
    /// Decode a job manifest and report its ownership
    Check(commands::check::CheckArgs),
    /// Print the PaddleJob CustomResourceDefinition
    Crd,
}

impl Cli {
    /// Run the CLI command. `cancel` aborts in-flight cluster requests.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        commands::run(self.cluster, self.command, cancel).await
    }
}
