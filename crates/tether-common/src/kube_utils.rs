//! Shared Kubernetes utilities using kube-rs
//!
//! Client construction for manager and worker clusters, manifest parsing and
//! metadata helpers used when a resource is copied between clusters.

use std::path::Path;
use std::time::Duration;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::DynamicObject;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::debug;

use crate::Error;

/// Default connection timeout for kube clients
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a kube client from optional kubeconfig path with custom timeouts
///
/// With no path the configuration is inferred (in-cluster service account or
/// `$KUBECONFIG`).
pub async fn create_client_with_timeout(
    kubeconfig: Option<&Path>,
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Client, Error> {
    let mut config = match kubeconfig {
        Some(path) => {
            debug!(path = %path.display(), "loading kubeconfig");
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                Error::internal_with_context(
                    "create_client",
                    format!("failed to read kubeconfig {}: {}", path.display(), e),
                )
            })?;
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| {
                    Error::internal_with_context(
                        "create_client",
                        format!("failed to load kubeconfig: {}", e),
                    )
                })?
        }
        None => Config::infer().await.map_err(|e| {
            Error::internal_with_context("create_client", format!("failed to infer config: {}", e))
        })?,
    };
    config.connect_timeout = Some(connect_timeout);
    config.read_timeout = Some(read_timeout);
    Client::try_from(config).map_err(|e| {
        Error::internal_with_context("create_client", format!("failed to create client: {}", e))
    })
}

/// Parse a single JSON or YAML manifest into a `DynamicObject`.
///
/// The manifest must carry `apiVersion`, `kind` and `metadata.name`.
pub fn parse_dynamic_object(manifest: &str) -> Result<DynamicObject, Error> {
    let obj: DynamicObject = serde_yaml::from_str(manifest)
        .map_err(|e| Error::serialization(format!("invalid manifest: {}", e)))?;

    if obj.types.is_none() {
        return Err(Error::validation_for_field(
            "apiVersion",
            "manifest is missing apiVersion/kind",
        ));
    }
    if obj.metadata.name.as_deref().unwrap_or_default().is_empty() {
        return Err(Error::validation_for_field(
            "metadata.name",
            "manifest is missing metadata.name",
        ));
    }
    Ok(obj)
}

/// Metadata for creating a copy of an object on another cluster.
///
/// Keeps name, namespace, labels and annotations. Everything the source
/// cluster assigned (uid, resourceVersion, generation, timestamps, managed
/// fields, owner references, finalizers) is dropped.
pub fn metadata_for_creation(meta: &ObjectMeta) -> ObjectMeta {
    ObjectMeta {
        name: meta.name.clone(),
        namespace: meta.namespace.clone(),
        labels: meta.labels.clone(),
        annotations: meta.annotations.clone(),
        ..Default::default()
    }
}
