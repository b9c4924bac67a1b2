//! Managed command

use clap::Args;
use tether_adapter::{JobBinding, KubeJobStore, MultiClusterAdapter, Ownership};
use tokio_util::sync::CancellationToken;

use super::{ClusterArgs, JobRef};
use crate::Result;

#[derive(Args, Debug)]
pub struct ManagedArgs {
    #[command(flatten)]
    pub job: JobRef,
}

pub async fn run<B: JobBinding>(
    adapter: &MultiClusterAdapter<B>,
    cluster: &ClusterArgs,
    args: ManagedArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let manager: KubeJobStore<B::Job> = cluster.manager_store(cancel).await?;
    let key = args.job.key();
    let ownership = adapter.is_job_managed(&manager, &key).await?;
    println!("{} {}", key, render(&ownership));
    Ok(())
}

/// One-line summary of an ownership answer
pub fn render(ownership: &Ownership) -> String {
    if ownership.managed {
        "managed".to_string()
    } else {
        format!("not managed: {}", ownership.reason)
    }
}
