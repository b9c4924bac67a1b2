//! Delete command

use clap::Args;
use tether_adapter::{JobBinding, KubeJobStore, MultiClusterAdapter};
use tokio_util::sync::CancellationToken;

use super::{ClusterArgs, JobRef};
use crate::Result;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub job: JobRef,
}

pub async fn run<B: JobBinding>(
    adapter: &MultiClusterAdapter<B>,
    cluster: &ClusterArgs,
    args: DeleteArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let worker: KubeJobStore<B::Job> = cluster.worker_store(cancel).await?;
    let key = args.job.key();
    adapter.delete_remote_object(&worker, &key).await?;
    println!("{} deleted", key);
    Ok(())
}
