//! Job store backed by a Kubernetes API server

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::Client;
use tether_common::FIELD_MANAGER;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::JobStore;
use crate::error::AdapterError;
use crate::job::{JobKey, ManagedJob};

/// [`JobStore`] over `Api<K>`.
///
/// Every request races the store's cancellation token and, when set, a
/// per-request timeout. A cancelled or expired request is dropped, which
/// aborts the HTTP call, and surfaces as `Cancelled` or `Timeout`.
pub struct KubeJobStore<K> {
    client: Client,
    cancel: CancellationToken,
    request_timeout: Option<Duration>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ManagedJob> KubeJobStore<K> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cancel: CancellationToken::new(),
            request_timeout: None,
            _kind: PhantomData,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn api(&self, namespace: &str) -> Api<K> {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn call<T, F>(
        &self,
        operation: &'static str,
        key: &JobKey,
        request: F,
    ) -> Result<T, AdapterError>
    where
        F: Future<Output = Result<T, kube::Error>> + Send,
        T: Send,
    {
        trace!(operation, job = %key, "store request");
        let bounded = async {
            let result = match self.request_timeout {
                Some(after) => tokio::time::timeout(after, request).await.map_err(|_| {
                    AdapterError::Timeout {
                        operation,
                        key: key.to_string(),
                        after,
                    }
                })?,
                None => request.await,
            };
            result.map_err(|e| classify::<K>(e, key))
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AdapterError::Cancelled {
                operation,
                key: key.to_string(),
            }),
            result = bounded => result,
        }
    }
}

/// Map API status codes onto the adapter's error taxonomy
fn classify<K: ManagedJob>(err: kube::Error, key: &JobKey) -> AdapterError {
    let kind = K::kind(&()).to_string();
    match &err {
        kube::Error::Api(ae) if ae.code == 404 => AdapterError::NotFound {
            kind,
            key: key.clone(),
        },
        kube::Error::Api(ae) if ae.code == 409 && ae.reason == "AlreadyExists" => {
            AdapterError::AlreadyExists {
                kind,
                key: key.clone(),
            }
        }
        kube::Error::Api(ae) if ae.code == 409 => AdapterError::Conflict {
            kind,
            key: key.clone(),
            message: ae.message.clone(),
        },
        _ => AdapterError::Kube(err),
    }
}

#[async_trait]
impl<K: ManagedJob> JobStore<K> for KubeJobStore<K> {
    async fn get(&self, key: &JobKey) -> Result<K, AdapterError> {
        let api = self.api(&key.namespace);
        self.call("get", key, api.get(&key.name)).await
    }

    async fn list(&self, namespace: Option<String>) -> Result<Vec<K>, AdapterError> {
        let (api, scope) = match namespace.as_deref() {
            Some(ns) => (self.api(ns), JobKey::new(ns, "*")),
            None => (Api::all(self.client.clone()), JobKey::new("*", "*")),
        };
        let lp = ListParams::default();
        let list = self.call("list", &scope, api.list(&lp)).await?;
        Ok(list.items)
    }

    async fn create(&self, job: &K) -> Result<K, AdapterError> {
        let key = JobKey::of(job);
        let api = self.api(&key.namespace);
        let pp = PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        self.call("create", &key, api.create(&pp, job)).await
    }

    async fn update_status(&self, job: &K) -> Result<K, AdapterError> {
        let key = JobKey::of(job);
        let api = self.api(&key.namespace);
        let pp = PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        // Full replacement so fields absent from `job`'s status are cleared.
        // The carried resourceVersion makes the write conditional.
        let data = serde_json::to_vec(job)?;
        self.call(
            "update_status",
            &key,
            api.replace_status(&key.name, &pp, data),
        )
        .await
    }

    async fn delete(&self, key: &JobKey) -> Result<(), AdapterError> {
        let api = self.api(&key.namespace);
        self.call(
            "delete",
            key,
            api.delete(&key.name, &DeleteParams::background()),
        )
        .await
        .map(|_| ())
    }
}
