//! Job stores: the only way the adapter touches a cluster
//!
//! The manager and worker clusters are each reached through a [`JobStore`].
//! Production code uses [`KubeJobStore`]; tests use [`MemoryStore`].

mod kube_store;
mod memory;

pub use kube_store::KubeJobStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::job::{JobKey, ManagedJob};

/// Typed access to jobs of one kind on one cluster
///
/// Every write is conditional: `create` fails with `AlreadyExists` when the
/// key is taken and `update_status` fails with `Conflict` when the object's
/// resourceVersion is stale.
#[async_trait]
pub trait JobStore<K: ManagedJob>: Send + Sync {
    /// Fetch a job, `NotFound` if absent
    async fn get(&self, key: &JobKey) -> Result<K, AdapterError>;

    /// List jobs in a namespace, or in all namespaces when `None`
    async fn list(&self, namespace: Option<String>) -> Result<Vec<K>, AdapterError>;

    /// Create a job, returning the stored object
    async fn create(&self, job: &K) -> Result<K, AdapterError>;

    /// Replace the status subresource of a job, returning the stored object
    async fn update_status(&self, job: &K) -> Result<K, AdapterError>;

    /// Delete a job, `NotFound` if absent
    async fn delete(&self, key: &JobKey) -> Result<(), AdapterError>;
}
