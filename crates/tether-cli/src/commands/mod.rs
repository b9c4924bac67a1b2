//! CLI commands

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, ValueEnum};
use tether_adapter::kinds::{BatchJobBinding, PaddleJobBinding};
use tether_adapter::{JobBinding, JobKey, KubeJobStore, ManagedJob, MultiClusterAdapter};
use tether_common::kube_utils::{create_client_with_timeout, DEFAULT_CONNECT_TIMEOUT};
use tether_common::telemetry::LogFormat;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{Commands, Result};

pub mod check;
pub mod crd;
pub mod delete;
pub mod managed;
pub mod orphans;
pub mod sync;

/// Connection and output settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Kubeconfig for the manager cluster (inferred when unset)
    #[arg(long, global = true, env = "TETHER_MANAGER_KUBECONFIG")]
    pub manager_kubeconfig: Option<PathBuf>,

    /// Kubeconfig for the worker cluster (inferred when unset)
    #[arg(long, global = true, env = "TETHER_WORKER_KUBECONFIG")]
    pub worker_kubeconfig: Option<PathBuf>,

    /// Job kind to operate on
    #[arg(long, global = true, value_enum, default_value_t = JobKind::Paddlejob)]
    pub kind: JobKind,

    /// Per-request timeout against either cluster
    #[arg(
        long,
        global = true,
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

impl ClusterArgs {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Store for the manager cluster
    pub async fn manager_store<K: ManagedJob>(
        &self,
        cancel: &CancellationToken,
    ) -> Result<KubeJobStore<K>> {
        self.store(self.manager_kubeconfig.as_deref(), cancel).await
    }

    /// Store for the worker cluster
    pub async fn worker_store<K: ManagedJob>(
        &self,
        cancel: &CancellationToken,
    ) -> Result<KubeJobStore<K>> {
        self.store(self.worker_kubeconfig.as_deref(), cancel).await
    }

    async fn store<K: ManagedJob>(
        &self,
        kubeconfig: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<KubeJobStore<K>> {
        let client =
            create_client_with_timeout(kubeconfig, DEFAULT_CONNECT_TIMEOUT, self.request_timeout())
                .await?;
        Ok(KubeJobStore::new(client)
            .with_cancellation(cancel.clone())
            .with_request_timeout(self.request_timeout()))
    }
}

/// Supported job kinds
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// kubeflow.org/v1 PaddleJob
    Paddlejob,
    /// batch/v1 Job
    Job,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Json,
    Text,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Text => LogFormat::Text,
        }
    }
}

/// Namespace and name of one job
#[derive(Args, Debug, Clone)]
pub struct JobRef {
    /// Job name
    pub name: String,

    /// Job namespace
    #[arg(short, long, default_value = "default")]
    pub namespace: String,
}

impl JobRef {
    pub fn key(&self) -> JobKey {
        JobKey::new(&self.namespace, &self.name)
    }
}

/// Dispatch a command to the binding selected by `--kind`
pub async fn run(cluster: ClusterArgs, command: Commands, cancel: CancellationToken) -> Result<()> {
    if let Commands::Crd = command {
        return crd::run();
    }
    debug!(kind = ?cluster.kind, "selected job kind");
    match cluster.kind {
        JobKind::Paddlejob => run_with(PaddleJobBinding, cluster, command, cancel).await,
        JobKind::Job => run_with(BatchJobBinding, cluster, command, cancel).await,
    }
}

async fn run_with<B: JobBinding>(
    binding: B,
    cluster: ClusterArgs,
    command: Commands,
    cancel: CancellationToken,
) -> Result<()> {
    let adapter = MultiClusterAdapter::new(binding);
    match command {
        Commands::Sync(args) => sync::run(&adapter, &cluster, args, &cancel).await,
        Commands::Delete(args) => delete::run(&adapter, &cluster, args, &cancel).await,
        Commands::Managed(args) => managed::run(&adapter, &cluster, args, &cancel).await,
        Commands::Orphans(args) => orphans::run(&adapter, &cluster, args, &cancel).await,
        Commands::Check(args) => check::run(&adapter, args),
        Commands::Crd => crd::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tether",
            "sync",
            "paddlejob1",
            "-n",
            "ns",
            "--workload",
            "wl1",
            "--origin",
            "origin1",
            "--kind",
            "job",
            "--request-timeout-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.cluster.kind, JobKind::Job);
        assert_eq!(cli.cluster.request_timeout(), Duration::from_secs(5));
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.job.key(), JobKey::new("ns", "paddlejob1"));
                assert_eq!(args.workload, "wl1");
                assert_eq!(args.origin, "origin1");
            }
            other => panic!("expected sync, got {:?}", other),
        }
    }

    #[test]
    fn defaults_to_paddlejob_in_default_namespace() {
        let cli = Cli::try_parse_from(["tether", "managed", "paddlejob1"]).unwrap();
        assert_eq!(cli.cluster.kind, JobKind::Paddlejob);
        assert_eq!(cli.cluster.log_format, LogFormatArg::Text);
        match cli.command {
            Commands::Managed(args) => {
                assert_eq!(args.job.key(), JobKey::new("default", "paddlejob1"))
            }
            other => panic!("expected managed, got {:?}", other),
        }
    }

    #[test]
    fn sync_requires_workload_and_origin() {
        assert!(Cli::try_parse_from(["tether", "sync", "paddlejob1"]).is_err());
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let args = |secs: &'static str| {
            ["tether", "managed", "paddlejob1", "--request-timeout-secs", secs]
        };
        assert!(Cli::try_parse_from(args("0")).is_err());
        let cli = Cli::try_parse_from(args("1")).unwrap();
        assert_eq!(cli.cluster.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["tether", "crd", "--kind", "mpijob"]).is_err());
    }

    #[test]
    fn log_format_maps_onto_telemetry() {
        assert_eq!(LogFormat::from(LogFormatArg::Json), LogFormat::Json);
        assert_eq!(LogFormat::from(LogFormatArg::Text), LogFormat::Text);
    }
}
