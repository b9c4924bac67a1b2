//! batch/v1 Job binding
//!
//! The API server defaults a Job's selector and stamps controller labels on
//! its pod template. Those are tied to the manager copy's uid, so they are
//! dropped from the remote copy and the worker regenerates them.

use k8s_openapi::api::batch::v1::Job;
use kube::api::{DynamicObject, GroupVersionKind};
use kube::Resource;

use crate::binding::{decode_object, JobBinding};
use crate::error::AdapterError;
use crate::job::ManagedJob;

/// Template labels set by the Job controller
const CONTROLLER_LABELS: [&str; 4] = [
    "batch.kubernetes.io/controller-uid",
    "batch.kubernetes.io/job-name",
    "controller-uid",
    "job-name",
];

impl ManagedJob for Job {
    fn is_suspended(&self) -> bool {
        self.spec
            .as_ref()
            .and_then(|spec| spec.suspend)
            .unwrap_or(false)
    }

    fn managed_by(&self) -> Option<&str> {
        self.spec.as_ref()?.managed_by.as_deref()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BatchJobBinding;

impl JobBinding for BatchJobBinding {
    type Job = Job;

    fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(&Job::group(&()), &Job::version(&()), &Job::kind(&()))
    }

    fn from_object(&self, obj: &DynamicObject) -> Result<Job, AdapterError> {
        decode_object(obj, &self.gvk())
    }

    fn copy_spec(&self, dst: &mut Job, src: &Job) {
        let mut spec = src.spec.clone();
        if let Some(spec) = spec.as_mut() {
            spec.managed_by = None;
            spec.selector = None;
            if let Some(labels) = spec
                .template
                .metadata
                .as_mut()
                .and_then(|meta| meta.labels.as_mut())
            {
                for label in CONTROLLER_LABELS {
                    labels.remove(label);
                }
            }
        }
        dst.spec = spec;
    }

    fn copy_status(&self, dst: &mut Job, src: &Job) {
        dst.status = src.status.clone();
    }
}
