//! Multi-cluster job synchronization
//!
//! A job created on the manager cluster and handed to the multi-cluster
//! controller runs as a copy on a worker cluster. This crate keeps the two
//! in step: it creates the remote copy, mirrors the remote status back,
//! deletes the copy when asked, and decides whether a job is delegated at
//! all.
//!
//! The engine is generic over the job kind. Each kind contributes a
//! [`JobBinding`]; [`kinds`] ships bindings for PaddleJob and batch/v1 Job.
//! Clusters are reached through a [`JobStore`], backed by the Kubernetes API
//! in production and by memory in tests.

pub mod adapter;
pub mod binding;
pub mod error;
pub mod job;
pub mod kinds;
pub mod lifecycle;
pub mod ownership;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testing;

pub use adapter::{new_adapter, MultiClusterAdapter};
pub use binding::{FnBinding, JobBinding, JobList};
pub use error::AdapterError;
pub use job::{JobKey, ManagedJob};
pub use ownership::Ownership;
pub use store::{JobStore, KubeJobStore, MemoryStore};
pub use sync::SyncOutcome;
