//! Fixtures shared by the unit tests

use async_trait::async_trait;
use mockall::mock;
use tether_common::crd::{
    ConditionStatus, JobCondition, JobConditionType, PaddleJob, PaddleJobSpec, PaddleJobStatus,
};
use tether_common::{MULTIKUEUE_ORIGIN_LABEL, PREBUILT_WORKLOAD_LABEL};

use crate::error::AdapterError;
use crate::job::JobKey;
use crate::store::JobStore;

mock! {
    pub PaddleStore {}

    #[async_trait]
    impl JobStore<PaddleJob> for PaddleStore {
        async fn get(&self, key: &JobKey) -> Result<PaddleJob, AdapterError>;
        async fn list(&self, namespace: Option<String>) -> Result<Vec<PaddleJob>, AdapterError>;
        async fn create(&self, job: &PaddleJob) -> Result<PaddleJob, AdapterError>;
        async fn update_status(&self, job: &PaddleJob) -> Result<PaddleJob, AdapterError>;
        async fn delete(&self, key: &JobKey) -> Result<(), AdapterError>;
    }
}

pub fn key() -> JobKey {
    JobKey::new("ns", "paddlejob1")
}

pub fn paddle_job() -> PaddleJob {
    paddle_job_named("paddlejob1")
}

pub fn paddle_job_named(name: &str) -> PaddleJob {
    let mut job = PaddleJob::new(name, PaddleJobSpec::default());
    job.metadata.namespace = Some("ns".to_string());
    job.spec.run_policy.suspend = Some(false);
    job
}

pub fn succeeded() -> Option<PaddleJobStatus> {
    Some(PaddleJobStatus {
        conditions: vec![JobCondition::new(
            JobConditionType::Succeeded,
            ConditionStatus::True,
        )],
        ..Default::default()
    })
}

pub fn with_status(mut job: PaddleJob, status: Option<PaddleJobStatus>) -> PaddleJob {
    job.status = status;
    job
}

pub fn managed_by(mut job: PaddleJob, controller: &str) -> PaddleJob {
    job.spec.run_policy.managed_by = Some(controller.to_string());
    job
}

pub fn suspended(mut job: PaddleJob) -> PaddleJob {
    job.spec.run_policy.suspend = Some(true);
    job
}

/// `job` as it looks once copied to a worker
pub fn remote(mut job: PaddleJob, workload: &str, origin: &str) -> PaddleJob {
    let labels = job.metadata.labels.get_or_insert_with(Default::default);
    labels.insert(PREBUILT_WORKLOAD_LABEL.to_string(), workload.to_string());
    labels.insert(MULTIKUEUE_ORIGIN_LABEL.to_string(), origin.to_string());
    job
}

/// Drop resourceVersions so store contents compare by value
pub fn strip_versions(jobs: Vec<PaddleJob>) -> Vec<PaddleJob> {
    jobs.into_iter()
        .map(|mut job| {
            job.metadata.resource_version = None;
            job
        })
        .collect()
}

pub fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} from api server", reason),
        reason: reason.to_string(),
        code,
    })
}
