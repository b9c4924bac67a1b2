//! The capability object handed to the outer reconciler
//!
//! A [`MultiClusterAdapter`] closes over one binding and exposes the
//! kind-agnostic operations for that kind. It holds no state besides the
//! binding, so one instance can serve any number of concurrent callers.

use kube::api::{DynamicObject, GroupVersionKind};
use tracing::instrument;

use crate::binding::{FnBinding, JobBinding, JobList};
use crate::error::AdapterError;
use crate::job::{JobKey, ManagedJob};
use crate::lifecycle;
use crate::ownership::{self, Ownership};
use crate::store::JobStore;
use crate::sync::{self, SyncOutcome};

pub struct MultiClusterAdapter<B> {
    binding: B,
}

/// Build an adapter from the five per-kind functions
pub fn new_adapter<J: ManagedJob>(
    copy_spec: fn(&mut J, &J),
    copy_status: fn(&mut J, &J),
    empty_list: fn() -> JobList<J>,
    gvk: fn() -> GroupVersionKind,
    from_object: fn(&DynamicObject) -> Result<J, AdapterError>,
) -> MultiClusterAdapter<FnBinding<J>> {
    MultiClusterAdapter::new(FnBinding {
        copy_spec,
        copy_status,
        empty_list,
        gvk,
        from_object,
    })
}

impl<B: JobBinding> MultiClusterAdapter<B> {
    pub fn new(binding: B) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn gvk(&self) -> GroupVersionKind {
        self.binding.gvk()
    }

    /// Ensure the worker has a copy of the job and pull its status back.
    pub async fn sync_job<M, W>(
        &self,
        manager: &M,
        worker: &W,
        key: &JobKey,
        workload: &str,
        origin: &str,
    ) -> Result<SyncOutcome, AdapterError>
    where
        M: JobStore<B::Job> + ?Sized,
        W: JobStore<B::Job> + ?Sized,
    {
        sync::sync_job(&self.binding, manager, worker, key, workload, origin).await
    }

    /// Delete the remote copy; succeeds when it is already gone.
    #[instrument(skip_all, fields(kind = %self.binding.gvk().kind, job = %key))]
    pub async fn delete_remote_object<S>(&self, store: &S, key: &JobKey) -> Result<(), AdapterError>
    where
        S: JobStore<B::Job> + ?Sized,
    {
        lifecycle::delete_remote_object::<B::Job, S>(store, key).await
    }

    /// Whether the job is handed to the multi-cluster controller.
    #[instrument(skip_all, fields(kind = %self.binding.gvk().kind, job = %key))]
    pub async fn is_job_managed<S>(&self, store: &S, key: &JobKey) -> Result<Ownership, AdapterError>
    where
        S: JobStore<B::Job> + ?Sized,
    {
        ownership::is_job_managed::<B::Job, S>(store, key).await
    }

    /// Remote copies on `store` created by `origin`
    pub async fn list_remote_jobs<S>(
        &self,
        store: &S,
        namespace: Option<&str>,
        origin: &str,
    ) -> Result<JobList<B::Job>, AdapterError>
    where
        S: JobStore<B::Job> + ?Sized,
    {
        lifecycle::list_remote_jobs(&self.binding, store, namespace, origin).await
    }

    /// Typed view of a generic object
    pub fn job_from_object(&self, obj: &DynamicObject) -> Result<B::Job, AdapterError> {
        self.binding.from_object(obj)
    }

    /// Workload reference of a remote copy
    pub fn workload_ref<'a>(&self, job: &'a B::Job) -> Option<&'a str> {
        lifecycle::workload_ref(job)
    }
}
