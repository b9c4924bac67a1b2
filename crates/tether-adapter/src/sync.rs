//! Sync engine: keeps the worker copy of a job in step with the manager copy
//!
//! Spec flows manager → worker once, when the remote copy is created.
//! Status flows worker → manager on every call, unless the local job is
//! suspended. Each write is conditional so the outer reconciler can retry
//! any failure by calling again.

use std::collections::BTreeMap;

use kube::Resource;
use tether_common::kube_utils::metadata_for_creation;
use tether_common::{MULTIKUEUE_ORIGIN_LABEL, PREBUILT_WORKLOAD_LABEL};
use tracing::{debug, info, instrument};

use crate::binding::JobBinding;
use crate::error::AdapterError;
use crate::job::{JobKey, ManagedJob};
use crate::store::JobStore;

/// What a sync call did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The worker had no copy; one was created
    RemoteCreated,
    /// The local job is suspended; nothing was propagated
    SkippedSuspended,
    /// The local status was overwritten with the remote status
    StatusUpdated,
    /// Local and remote status already agree; nothing was written
    InSync,
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteCreated => write!(f, "RemoteCreated"),
            Self::SkippedSuspended => write!(f, "SkippedSuspended"),
            Self::StatusUpdated => write!(f, "StatusUpdated"),
            Self::InSync => write!(f, "InSync"),
        }
    }
}

/// Synchronize the job at `key` between the manager and a worker.
///
/// The local job must exist; `NotFound` from the manager is returned as is.
#[instrument(skip_all, fields(job = %key, workload = %workload, origin = %origin))]
pub async fn sync_job<B, M, W>(
    binding: &B,
    manager: &M,
    worker: &W,
    key: &JobKey,
    workload: &str,
    origin: &str,
) -> Result<SyncOutcome, AdapterError>
where
    B: JobBinding + ?Sized,
    M: JobStore<B::Job> + ?Sized,
    W: JobStore<B::Job> + ?Sized,
{
    let local = manager.get(key).await?;

    let remote = match worker.get(key).await {
        Ok(remote) => remote,
        Err(e) if e.is_not_found() => {
            let remote = remote_copy(binding, &local, workload, origin);
            worker.create(&remote).await?;
            info!("created remote job");
            return Ok(SyncOutcome::RemoteCreated);
        }
        Err(e) => return Err(e),
    };

    if local.is_suspended() {
        debug!("local job is suspended, not syncing status");
        return Ok(SyncOutcome::SkippedSuspended);
    }

    let mut updated = local.clone();
    binding.copy_status(&mut updated, &remote);
    if updated == local {
        debug!("status already in sync");
        return Ok(SyncOutcome::InSync);
    }

    manager.update_status(&updated).await?;
    info!("copied remote status to local job");
    Ok(SyncOutcome::StatusUpdated)
}

/// The object created on the worker for `local`.
///
/// Spec comes from the binding. Metadata is the creatable part of the local
/// metadata plus the workload and origin labels.
pub fn remote_copy<B>(binding: &B, local: &B::Job, workload: &str, origin: &str) -> B::Job
where
    B: JobBinding + ?Sized,
{
    let mut remote = B::Job::default();
    binding.copy_spec(&mut remote, local);

    let mut meta = metadata_for_creation(local.meta());
    let labels = meta.labels.get_or_insert_with(BTreeMap::new);
    labels.insert(PREBUILT_WORKLOAD_LABEL.to_string(), workload.to_string());
    labels.insert(MULTIKUEUE_ORIGIN_LABEL.to_string(), origin.to_string());
    *remote.meta_mut() = meta;
    remote
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::paddlejob::PaddleJobBinding;
    use crate::store::MemoryStore;
    use crate::testing::{
        api_error, key, paddle_job, succeeded, with_status, MockPaddleStore,
    };
    use kube::ResourceExt;
    use tether_common::crd::PaddleJob;

    #[test]
    fn remote_copy_adds_labels_and_drops_server_fields() {
        let mut local = paddle_job();
        local.metadata.uid = Some("uid-1".to_string());
        local.metadata.resource_version = Some("7".to_string());
        local.metadata.finalizers = Some(vec!["kueue.x-k8s.io/managed".to_string()]);
        local.status = succeeded();
        local
            .labels_mut()
            .insert("kueue.x-k8s.io/queue-name".to_string(), "queue".to_string());

        let remote = remote_copy(&PaddleJobBinding, &local, "wl1", "origin1");

        assert_eq!(remote.name_any(), "paddlejob1");
        assert_eq!(remote.namespace().as_deref(), Some("ns"));
        assert_eq!(remote.labels().len(), 3);
        assert_eq!(remote.labels()[PREBUILT_WORKLOAD_LABEL], "wl1");
        assert_eq!(remote.labels()[MULTIKUEUE_ORIGIN_LABEL], "origin1");
        assert_eq!(remote.labels()["kueue.x-k8s.io/queue-name"], "queue");
        assert!(remote.metadata.uid.is_none());
        assert!(remote.metadata.resource_version.is_none());
        assert!(remote.metadata.finalizers.is_none());
        assert!(remote.status.is_none());
        assert_eq!(remote.spec, local.spec);
    }

    #[tokio::test]
    async fn missing_local_job_is_not_found() {
        let manager: MemoryStore<PaddleJob> = MemoryStore::new();
        let worker: MemoryStore<PaddleJob> = MemoryStore::new();

        let err = sync_job(&PaddleJobBinding, &manager, &worker, &key(), "wl1", "origin1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(worker.is_empty());
    }

    #[tokio::test]
    async fn worker_lookup_failure_is_surfaced() {
        let manager = MemoryStore::with_objects([paddle_job()]);
        let mut worker = MockPaddleStore::new();
        worker
            .expect_get()
            .returning(|_| Err(AdapterError::Kube(api_error(500, "InternalError"))));
        worker.expect_create().never();

        let err = sync_job(&PaddleJobBinding, &manager, &worker, &key(), "wl1", "origin1")
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Kube(_)));
    }

    #[tokio::test]
    async fn create_race_is_surfaced_not_retried() {
        let manager = MemoryStore::with_objects([paddle_job()]);
        let mut worker = MockPaddleStore::new();
        worker.expect_get().times(1).returning(|k| {
            Err(AdapterError::NotFound {
                kind: "PaddleJob".to_string(),
                key: k.clone(),
            })
        });
        worker.expect_create().times(1).returning(|job| {
            Err(AdapterError::AlreadyExists {
                kind: "PaddleJob".to_string(),
                key: JobKey::of(job),
            })
        });

        let err = sync_job(&PaddleJobBinding, &manager, &worker, &key(), "wl1", "origin1")
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn status_conflict_is_surfaced() {
        let mut manager = MockPaddleStore::new();
        manager
            .expect_get()
            .returning(|_| Ok(with_resource_version(paddle_job(), "3")));
        manager.expect_update_status().times(1).returning(|job| {
            assert_eq!(job.resource_version().as_deref(), Some("3"));
            Err(AdapterError::Conflict {
                kind: "PaddleJob".to_string(),
                key: JobKey::of(job),
                message: "the object has been modified".to_string(),
            })
        });
        let worker = MemoryStore::with_objects([with_status(paddle_job(), succeeded())]);

        let err = sync_job(&PaddleJobBinding, &manager, &worker, &key(), "wl1", "origin1")
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Conflict { .. }));
    }

    #[tokio::test]
    async fn equal_status_issues_no_write() {
        let mut manager = MockPaddleStore::new();
        manager
            .expect_get()
            .returning(|_| Ok(with_status(paddle_job(), succeeded())));
        manager.expect_update_status().never();
        let worker = MemoryStore::with_objects([with_status(paddle_job(), succeeded())]);

        let outcome = sync_job(&PaddleJobBinding, &manager, &worker, &key(), "wl1", "origin1")
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::InSync);
    }

    fn with_resource_version(mut job: PaddleJob, rv: &str) -> PaddleJob {
        job.metadata.resource_version = Some(rv.to_string());
        job
    }

    #[test]
    fn outcome_display() {
        assert_eq!(SyncOutcome::RemoteCreated.to_string(), "RemoteCreated");
        assert_eq!(SyncOutcome::SkippedSuspended.to_string(), "SkippedSuspended");
        assert_eq!(SyncOutcome::StatusUpdated.to_string(), "StatusUpdated");
        assert_eq!(SyncOutcome::InSync.to_string(), "InSync");
    }
}
