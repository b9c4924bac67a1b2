//! Common types for tether: CRDs, errors, and utilities

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod kube_utils;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Managed-by value that hands a job to the multi-cluster controller
pub const MULTIKUEUE_CONTROLLER_NAME: &str = "kueue.x-k8s.io/multikueue";

/// Label on a remote copy naming the workload that authorized delegation
pub const PREBUILT_WORKLOAD_LABEL: &str = "kueue.x-k8s.io/prebuilt-workload-name";

/// Label on a remote copy naming the manager instance that created it
pub const MULTIKUEUE_ORIGIN_LABEL: &str = "kueue.x-k8s.io/multikueue-origin";

/// Field manager used for writes issued by the adapter
pub const FIELD_MANAGER: &str = "tether-multikueue-adapter";
