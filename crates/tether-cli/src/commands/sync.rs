//! Sync command

use clap::Args;
use tether_adapter::{JobBinding, KubeJobStore, MultiClusterAdapter};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{ClusterArgs, JobRef};
use crate::Result;

#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub job: JobRef,

    /// Name of the workload admitted for this job
    #[arg(long)]
    pub workload: String,

    /// Identifier of this manager, stamped on the remote copy
    #[arg(long, env = "TETHER_ORIGIN")]
    pub origin: String,
}

pub async fn run<B: JobBinding>(
    adapter: &MultiClusterAdapter<B>,
    cluster: &ClusterArgs,
    args: SyncArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let manager: KubeJobStore<B::Job> = cluster.manager_store(cancel).await?;
    let worker: KubeJobStore<B::Job> = cluster.worker_store(cancel).await?;
    let key = args.job.key();

    let outcome = adapter
        .sync_job(&manager, &worker, &key, &args.workload, &args.origin)
        .await?;
    info!(job = %key, %outcome, "sync finished");
    println!("{} {}", key, outcome);
    Ok(())
}
