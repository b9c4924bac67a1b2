//! Remote copy lifecycle: deletion and inventory on worker clusters

use kube::ResourceExt;
use tether_common::{MULTIKUEUE_ORIGIN_LABEL, PREBUILT_WORKLOAD_LABEL};
use tracing::{debug, info};

use crate::binding::{JobBinding, JobList};
use crate::error::AdapterError;
use crate::job::{JobKey, ManagedJob};
use crate::store::JobStore;

/// Delete the job at `key`. Deleting a job that is already gone succeeds.
pub async fn delete_remote_object<K, S>(store: &S, key: &JobKey) -> Result<(), AdapterError>
where
    K: ManagedJob,
    S: JobStore<K> + ?Sized,
{
    match store.delete(key).await {
        Ok(()) => {
            info!(job = %key, "deleted remote job");
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            debug!(job = %key, "remote job already gone");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Remote copies created by the manager identified by `origin`
pub async fn list_remote_jobs<B, S>(
    binding: &B,
    store: &S,
    namespace: Option<&str>,
    origin: &str,
) -> Result<JobList<B::Job>, AdapterError>
where
    B: JobBinding + ?Sized,
    S: JobStore<B::Job> + ?Sized,
{
    let mut list = binding.empty_list();
    list.items = store
        .list(namespace.map(str::to_string))
        .await?
        .into_iter()
        .filter(|job| origin_of(job) == Some(origin))
        .collect();
    Ok(list)
}

/// Workload reference carried by a remote copy
pub fn workload_ref<K: ManagedJob>(job: &K) -> Option<&str> {
    job.labels().get(PREBUILT_WORKLOAD_LABEL).map(String::as_str)
}

/// Origin tag carried by a remote copy
pub fn origin_of<K: ManagedJob>(job: &K) -> Option<&str> {
    job.labels().get(MULTIKUEUE_ORIGIN_LABEL).map(String::as_str)
}
