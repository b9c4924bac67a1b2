//! In-process job store
//!
//! Behaves like an API server with a status subresource: `create` ignores
//! the submitted status, `update_status` only touches status, and every
//! write bumps a resourceVersion that later writes are checked against.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use kube::ResourceExt;

use super::JobStore;
use crate::error::AdapterError;
use crate::job::{JobKey, ManagedJob};

pub struct MemoryStore<K> {
    objects: DashMap<JobKey, K>,
    revision: AtomicU64,
}

impl<K: ManagedJob> Default for MemoryStore<K> {
    fn default() -> Self {
        Self {
            objects: DashMap::new(),
            revision: AtomicU64::new(0),
        }
    }
}

impl<K: ManagedJob> MemoryStore<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with existing objects, status included
    pub fn with_objects(objects: impl IntoIterator<Item = K>) -> Self {
        let store = Self::new();
        for mut obj in objects {
            obj.meta_mut().resource_version = Some(store.next_revision());
            store.objects.insert(JobKey::of(&obj), obj);
        }
        store
    }

    /// All stored objects ordered by key
    pub fn snapshot(&self) -> Vec<K> {
        let mut entries: Vec<(JobKey, K)> = self
            .objects
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, obj)| obj).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn next_revision(&self) -> String {
        (self.revision.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn not_found(key: &JobKey) -> AdapterError {
        AdapterError::NotFound {
            kind: K::kind(&()).to_string(),
            key: key.clone(),
        }
    }
}

/// `target` with its status replaced by `source`'s, or removed when `source` is `None`
fn with_status_of<K: ManagedJob>(target: &K, source: Option<&K>) -> Result<K, AdapterError> {
    let mut value = serde_json::to_value(target)?;
    let status = match source {
        Some(src) => serde_json::to_value(src)?
            .get("status")
            .cloned()
            .unwrap_or(serde_json::Value::Null),
        None => serde_json::Value::Null,
    };
    let obj = value
        .as_object_mut()
        .ok_or_else(|| AdapterError::Backend("job did not serialize to an object".to_string()))?;
    if status.is_null() {
        obj.remove("status");
    } else {
        obj.insert("status".to_string(), status);
    }
    Ok(serde_json::from_value(value)?)
}

#[async_trait]
impl<K: ManagedJob> JobStore<K> for MemoryStore<K> {
    async fn get(&self, key: &JobKey) -> Result<K, AdapterError> {
        self.objects
            .get(key)
            .map(|e| e.value().clone())
            .ok_or_else(|| Self::not_found(key))
    }

    async fn list(&self, namespace: Option<String>) -> Result<Vec<K>, AdapterError> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|obj| namespace.is_none() || obj.namespace() == namespace)
            .collect())
    }

    async fn create(&self, job: &K) -> Result<K, AdapterError> {
        let key = JobKey::of(job);
        match self.objects.entry(key.clone()) {
            Entry::Occupied(_) => Err(AdapterError::AlreadyExists {
                kind: K::kind(&()).to_string(),
                key,
            }),
            Entry::Vacant(slot) => {
                let mut stored = with_status_of(job, None)?;
                stored.meta_mut().resource_version = Some(self.next_revision());
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn update_status(&self, job: &K) -> Result<K, AdapterError> {
        let key = JobKey::of(job);
        let mut entry = self
            .objects
            .get_mut(&key)
            .ok_or_else(|| Self::not_found(&key))?;

        let current = entry.resource_version();
        if job.resource_version().is_some() && job.resource_version() != current {
            return Err(AdapterError::Conflict {
                kind: K::kind(&()).to_string(),
                key,
                message: format!(
                    "resourceVersion {} is stale, current is {}",
                    job.resource_version().unwrap_or_default(),
                    current.unwrap_or_default()
                ),
            });
        }

        let mut updated = with_status_of(entry.value(), Some(job))?;
        updated.meta_mut().resource_version = Some(self.next_revision());
        *entry = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, key: &JobKey) -> Result<(), AdapterError> {
        self.objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(key))
    }
}
