//! PaddleJob binding
//!
//! The remote copy carries the full spec except `runPolicy.managedBy`: on the
//! worker the training operator itself must own the job.

use kube::api::{DynamicObject, GroupVersionKind};
use kube::Resource;
use tether_common::crd::PaddleJob;

use crate::adapter::{new_adapter, MultiClusterAdapter};
use crate::binding::{decode_object, FnBinding, JobBinding, JobList};
use crate::error::AdapterError;
use crate::job::ManagedJob;

impl ManagedJob for PaddleJob {
    fn is_suspended(&self) -> bool {
        PaddleJob::is_suspended(self)
    }

    fn managed_by(&self) -> Option<&str> {
        PaddleJob::managed_by(self)
    }
}

pub fn copy_job_spec(dst: &mut PaddleJob, src: &PaddleJob) {
    dst.spec = src.spec.clone();
    dst.spec.run_policy.managed_by = None;
}

pub fn copy_job_status(dst: &mut PaddleJob, src: &PaddleJob) {
    dst.status = src.status.clone();
}

pub fn gvk() -> GroupVersionKind {
    GroupVersionKind::gvk(
        &PaddleJob::group(&()),
        &PaddleJob::version(&()),
        &PaddleJob::kind(&()),
    )
}

pub fn empty_list() -> JobList<PaddleJob> {
    JobList::new(gvk())
}

pub fn from_object(obj: &DynamicObject) -> Result<PaddleJob, AdapterError> {
    decode_object(obj, &gvk())
}

/// Adapter for PaddleJobs built from the plain functions above
pub fn adapter() -> MultiClusterAdapter<FnBinding<PaddleJob>> {
    new_adapter(copy_job_spec, copy_job_status, empty_list, gvk, from_object)
}

/// Zero-sized binding for callers that prefer a trait impl
#[derive(Clone, Copy, Debug, Default)]
pub struct PaddleJobBinding;

impl JobBinding for PaddleJobBinding {
    type Job = PaddleJob;

    fn gvk(&self) -> GroupVersionKind {
        gvk()
    }

    fn from_object(&self, obj: &DynamicObject) -> Result<PaddleJob, AdapterError> {
        from_object(obj)
    }

    fn copy_spec(&self, dst: &mut PaddleJob, src: &PaddleJob) {
        copy_job_spec(dst, src)
    }

    fn copy_status(&self, dst: &mut PaddleJob, src: &PaddleJob) {
        copy_job_status(dst, src)
    }
}
