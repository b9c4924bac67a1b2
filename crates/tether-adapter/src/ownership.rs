//! Ownership detection: is a local job handed to the multi-cluster controller?

use tether_common::MULTIKUEUE_CONTROLLER_NAME;
use tracing::debug;

use crate::error::AdapterError;
use crate::job::{JobKey, ManagedJob};
use crate::store::JobStore;

/// Result of an ownership check.
///
/// `reason` is a free-form diagnostic explaining a negative answer; it is
/// empty when the job is managed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ownership {
    pub managed: bool,
    pub reason: String,
}

impl Ownership {
    fn managed() -> Self {
        Self {
            managed: true,
            reason: String::new(),
        }
    }

    fn unmanaged(reason: impl Into<String>) -> Self {
        Self {
            managed: false,
            reason: reason.into(),
        }
    }
}

/// Check whether the job at `key` is managed by the multi-cluster controller.
///
/// A missing job is reported as unmanaged, not as an error.
pub async fn is_job_managed<K, S>(store: &S, key: &JobKey) -> Result<Ownership, AdapterError>
where
    K: ManagedJob,
    S: JobStore<K> + ?Sized,
{
    let job = match store.get(key).await {
        Ok(job) => job,
        Err(e) if e.is_not_found() => {
            debug!(job = %key, "job not found, treating as unmanaged");
            return Ok(Ownership::unmanaged(format!("{} not found", key)));
        }
        Err(e) => return Err(e),
    };

    Ok(ownership_of(&job))
}

/// Ownership of a job already in hand
pub fn ownership_of<K: ManagedJob>(job: &K) -> Ownership {
    match job.managed_by() {
        Some(MULTIKUEUE_CONTROLLER_NAME) => Ownership::managed(),
        other => Ownership::unmanaged(format!(
            "expecting managedBy to be {:?} not {:?}",
            MULTIKUEUE_CONTROLLER_NAME,
            other.unwrap_or_default()
        )),
    }
}
