//! PaddleJob CRD types (`kubeflow.org/v1`)
//!
//! Mirrors the training-operator schema closely enough to round-trip objects
//! between a manager and a worker cluster. Pod templates are carried as
//! opaque JSON so nothing the worker's controller needs is lost.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Conditions
// =============================================================================

/// Condition status following Kubernetes conventions
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// Condition is true
    True,
    /// Condition is false
    False,
    /// Condition status is unknown
    #[default]
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Type of a training job condition
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum JobConditionType {
    /// Job was accepted by the training operator
    Created,
    /// All sub-resources were created and at least one pod is running
    Running,
    /// Pods are being restarted after a failure
    Restarting,
    /// Job finished successfully
    Succeeded,
    /// Job is suspended
    Suspended,
    /// Job failed
    Failed,
}

impl std::fmt::Display for JobConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Running => write!(f, "Running"),
            Self::Restarting => write!(f, "Restarting"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Suspended => write!(f, "Suspended"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Observed condition of a training job
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobCondition {
    /// Type of condition
    #[serde(rename = "type")]
    pub type_: JobConditionType,

    /// Status of the condition
    pub status: ConditionStatus,

    /// Machine-readable reason for the last transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last time the condition was updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<DateTime<Utc>>,

    /// Last time the condition transitioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl JobCondition {
    /// Create a condition without reason, message or timestamps
    pub fn new(type_: JobConditionType, status: ConditionStatus) -> Self {
        Self {
            type_,
            status,
            reason: None,
            message: None,
            last_update_time: None,
            last_transition_time: None,
        }
    }
}

// =============================================================================
// Run policy
// =============================================================================

/// Which pods to delete once the job finishes
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum CleanPodPolicy {
    /// Delete every pod
    All,
    /// Delete only running pods
    Running,
    /// Keep all pods
    None,
}

/// Runtime policy shared by all kubeflow training jobs
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunPolicy {
    /// Pod cleanup policy after completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_pod_policy: Option<CleanPodPolicy>,

    /// Seconds to keep the finished job before deleting it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_after_finished: Option<i32>,

    /// Maximum run time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_deadline_seconds: Option<i64>,

    /// Number of retries before marking the job failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_limit: Option<i32>,

    /// Whether the job is suspended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,

    /// Controller responsible for reconciling this job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
}

// =============================================================================
// Replicas
// =============================================================================

/// Restart policy for replica pods
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Always restart
    Always,
    /// Restart on failure
    OnFailure,
    /// Never restart
    Never,
    /// Restart depending on the container exit code
    ExitCode,
}

/// Replica group of a PaddleJob (e.g. "Master", "Worker")
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSpec {
    /// Desired replica count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Pod template, passed through untouched
    #[serde(default)]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub template: serde_json::Value,

    /// Restart policy for pods of this replica group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<RestartPolicy>,
}

/// Observed pod counts for a replica group
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaStatus {
    /// Running pods
    #[serde(default)]
    pub active: i32,
    /// Pods that finished successfully
    #[serde(default)]
    pub succeeded: i32,
    /// Pods that failed
    #[serde(default)]
    pub failed: i32,
    /// Selector matching the pods of this replica group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

fn preserve_unknown_fields(_gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
    let mut schema = schemars::schema::SchemaObject {
        instance_type: Some(schemars::schema::InstanceType::Object.into()),
        ..Default::default()
    };
    schema.extensions.insert(
        "x-kubernetes-preserve-unknown-fields".to_string(),
        serde_json::Value::Bool(true),
    );
    schemars::schema::Schema::Object(schema)
}

// =============================================================================
// CRD
// =============================================================================

/// Distributed PaddlePaddle training job
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "kubeflow.org",
    version = "v1",
    kind = "PaddleJob",
    plural = "paddlejobs",
    namespaced,
    status = "PaddleJobStatus",
    derive = "PartialEq",
    printcolumn = r#"{"name":"State","type":"string","jsonPath":".status.conditions[-1:].type"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct PaddleJobSpec {
    /// Policies applied to the whole job
    #[serde(default)]
    pub run_policy: RunPolicy,

    /// Replica groups keyed by replica type
    #[serde(default)]
    pub paddle_replica_specs: BTreeMap<String, ReplicaSpec>,
}

impl Default for PaddleJobSpec {
    fn default() -> Self {
        Self {
            run_policy: RunPolicy::default(),
            paddle_replica_specs: BTreeMap::new(),
        }
    }
}

/// Status of a PaddleJob, written by the training operator
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaddleJobStatus {
    /// Observed conditions, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<JobCondition>,

    /// Per replica group pod counts
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub replica_statuses: BTreeMap<String, ReplicaStatus>,

    /// When the job was first acknowledged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    /// When the job finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,

    /// Last time the job was reconciled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reconcile_time: Option<DateTime<Utc>>,
}

impl Default for PaddleJob {
    fn default() -> Self {
        let mut job = PaddleJob::new("", PaddleJobSpec::default());
        job.metadata = ObjectMeta::default();
        job
    }
}

impl PaddleJob {
    /// Whether `spec.runPolicy.suspend` is set
    pub fn is_suspended(&self) -> bool {
        self.spec.run_policy.suspend.unwrap_or(false)
    }

    /// Value of `spec.runPolicy.managedBy`
    pub fn managed_by(&self) -> Option<&str> {
        self.spec.run_policy.managed_by.as_deref()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    fn succeeded_status() -> PaddleJobStatus {
        PaddleJobStatus {
            conditions: vec![JobCondition::new(
                JobConditionType::Succeeded,
                ConditionStatus::True,
            )],
            ..Default::default()
        }
    }

    #[test]
    fn default_job_is_empty() {
        let job = PaddleJob::default();
        assert!(job.metadata.name.is_none());
        assert!(job.spec.paddle_replica_specs.is_empty());
        assert!(job.status.is_none());
        assert!(!job.is_suspended());
        assert!(job.managed_by().is_none());
    }

    #[test]
    fn run_policy_accessors() {
        let mut job = PaddleJob::new("paddlejob1", PaddleJobSpec::default());
        job.spec.run_policy.suspend = Some(true);
        job.spec.run_policy.managed_by = Some("kueue.x-k8s.io/multikueue".to_string());
        assert!(job.is_suspended());
        assert_eq!(job.managed_by(), Some("kueue.x-k8s.io/multikueue"));
    }

    #[test]
    fn jobs_compare_by_value() {
        let job = PaddleJob::new("paddlejob1", PaddleJobSpec::default());
        assert_eq!(job.clone(), job);

        let mut finished = job.clone();
        finished.status = Some(succeeded_status());
        assert_ne!(finished, job);

        let mut suspended = job.clone();
        suspended.spec.run_policy.suspend = Some(true);
        assert_ne!(suspended, job);
    }

    #[test]
    fn serializes_with_kubeflow_field_names() {
        let mut job = PaddleJob::new("paddlejob1", PaddleJobSpec::default());
        job.spec.run_policy.managed_by = Some("kueue.x-k8s.io/multikueue".to_string());
        job.spec.paddle_replica_specs.insert(
            "Worker".to_string(),
            ReplicaSpec {
                replicas: Some(2),
                template: serde_json::json!({"spec": {"containers": [{"name": "paddle"}]}}),
                restart_policy: Some(RestartPolicy::OnFailure),
            },
        );
        job.status = Some(succeeded_status());

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["apiVersion"], "kubeflow.org/v1");
        assert_eq!(value["kind"], "PaddleJob");
        assert_eq!(
            value["spec"]["runPolicy"]["managedBy"],
            "kueue.x-k8s.io/multikueue"
        );
        assert_eq!(value["spec"]["paddleReplicaSpecs"]["Worker"]["replicas"], 2);
        assert_eq!(value["status"]["conditions"][0]["type"], "Succeeded");
        assert_eq!(value["status"]["conditions"][0]["status"], "True");

        let back: PaddleJob = serde_json::from_value(value).unwrap();
        assert_eq!(back, job);
    }

    #[test]
    fn crd_preserves_pod_templates() {
        let crd = serde_json::to_value(PaddleJob::crd()).unwrap();
        assert_eq!(crd["spec"]["group"], "kubeflow.org");
        assert_eq!(crd["spec"]["names"]["kind"], "PaddleJob");
        let template = &crd["spec"]["versions"][0]["schema"]["openAPIV3Schema"]["properties"]
            ["spec"]["properties"]["paddleReplicaSpecs"]["additionalProperties"]["properties"]
            ["template"];
        assert_eq!(template["x-kubernetes-preserve-unknown-fields"], true);
    }
}
