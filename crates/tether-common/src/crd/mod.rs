//! Custom Resource Definitions understood by tether
//!
//! Only kinds that are not part of the core Kubernetes API live here;
//! `batch/v1` Job comes from k8s-openapi.

mod paddlejob;

pub use paddlejob::{
    CleanPodPolicy, ConditionStatus, JobCondition, JobConditionType, PaddleJob, PaddleJobSpec,
    PaddleJobStatus, ReplicaSpec, ReplicaStatus, RestartPolicy, RunPolicy,
};
