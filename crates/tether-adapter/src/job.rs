//! The job resource abstraction shared by every supported kind

use std::fmt;

use k8s_openapi::NamespaceResourceScope;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Namespace and name of a job. The same key addresses the manager copy and
/// the worker copy.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobKey {
    pub namespace: String,
    pub name: String,
}

impl JobKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key of an existing object. Cluster-scoped objects get an empty namespace.
    pub fn of<K: Resource>(obj: &K) -> Self {
        Self::new(
            obj.meta().namespace.clone().unwrap_or_default(),
            obj.name_any(),
        )
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A namespaced job kind the adapter can delegate.
///
/// Besides the Kubernetes plumbing, the engine needs two facts about a job:
/// whether it is suspended and which controller it is handed to. Everything
/// kind-specific beyond that goes through a [`crate::JobBinding`].
pub trait ManagedJob:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + Default
    + PartialEq
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Whether the job is currently suspended
    fn is_suspended(&self) -> bool;

    /// The managed-by designation, if any
    fn managed_by(&self) -> Option<&str>;
}
