//! Orphans command
//!
//! A remote copy is orphaned when the manager job it was created for no
//! longer exists. Only copies stamped with this manager's origin are
//! considered; other managers may share the worker.

use clap::Args;
use tether_adapter::{JobBinding, JobKey, JobStore, KubeJobStore, MultiClusterAdapter};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::ClusterArgs;
use crate::Result;

#[derive(Args, Debug)]
pub struct OrphansArgs {
    /// Identifier of this manager
    #[arg(long, env = "TETHER_ORIGIN")]
    pub origin: String,

    /// Restrict to one namespace (all namespaces when unset)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Delete the orphaned copies instead of only listing them
    #[arg(long)]
    pub delete: bool,
}

/// A remote copy without a manager job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub key: JobKey,
    pub workload: Option<String>,
}

pub async fn run<B: JobBinding>(
    adapter: &MultiClusterAdapter<B>,
    cluster: &ClusterArgs,
    args: OrphansArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let manager: KubeJobStore<B::Job> = cluster.manager_store(cancel).await?;
    let worker: KubeJobStore<B::Job> = cluster.worker_store(cancel).await?;

    let orphans = find_orphans(
        adapter,
        &manager,
        &worker,
        args.namespace.as_deref(),
        &args.origin,
    )
    .await?;

    for orphan in &orphans {
        if args.delete {
            adapter.delete_remote_object(&worker, &orphan.key).await?;
            println!("{} deleted", orphan.key);
        } else {
            println!(
                "{} workload={}",
                orphan.key,
                orphan.workload.as_deref().unwrap_or("<none>")
            );
        }
    }
    info!(count = orphans.len(), origin = %args.origin, "orphan scan finished");
    Ok(())
}

/// Remote copies from `origin` whose manager job is gone
pub async fn find_orphans<B, M, W>(
    adapter: &MultiClusterAdapter<B>,
    manager: &M,
    worker: &W,
    namespace: Option<&str>,
    origin: &str,
) -> Result<Vec<Orphan>>
where
    B: JobBinding,
    M: JobStore<B::Job> + ?Sized,
    W: JobStore<B::Job> + ?Sized,
{
    let remote = adapter.list_remote_jobs(worker, namespace, origin).await?;
    let mut orphans = Vec::new();
    for job in &remote.items {
        let key = JobKey::of(job);
        match manager.get(&key).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => orphans.push(Orphan {
                key,
                workload: adapter.workload_ref(job).map(str::to_string),
            }),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(orphans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::api::ObjectMeta;
    use tether_adapter::kinds::paddlejob;
    use tether_adapter::MemoryStore;
    use tether_common::crd::{PaddleJob, PaddleJobSpec};
    use tether_common::{MULTIKUEUE_ORIGIN_LABEL, PREBUILT_WORKLOAD_LABEL};

    fn job(name: &str, labels: &[(&str, &str)]) -> PaddleJob {
        let mut job = PaddleJob::new(name, PaddleJobSpec::default());
        job.metadata = ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("ns".to_string()),
            labels: Some(
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Default::default()
        };
        job
    }

    fn copy(name: &str, origin: &str) -> PaddleJob {
        job(
            name,
            &[
                (PREBUILT_WORKLOAD_LABEL, &format!("wl-{}", name)),
                (MULTIKUEUE_ORIGIN_LABEL, origin),
            ],
        )
    }

    #[tokio::test]
    async fn copies_without_manager_job_are_orphans() {
        let manager = MemoryStore::with_objects([job("kept", &[])]);
        let worker = MemoryStore::with_objects([
            copy("kept", "origin1"),
            copy("gone", "origin1"),
            copy("foreign", "origin2"),
        ]);

        let orphans = find_orphans(&paddlejob::adapter(), &manager, &worker, None, "origin1")
            .await
            .unwrap();

        assert_eq!(
            orphans,
            vec![Orphan {
                key: JobKey::new("ns", "gone"),
                workload: Some("wl-gone".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn nothing_is_orphaned_on_an_empty_worker() {
        let manager: MemoryStore<PaddleJob> = MemoryStore::new();
        let worker: MemoryStore<PaddleJob> = MemoryStore::new();
        let orphans = find_orphans(&paddlejob::adapter(), &manager, &worker, Some("ns"), "origin1")
            .await
            .unwrap();
        assert!(orphans.is_empty());
    }
}
