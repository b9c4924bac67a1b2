//! Check command
//!
//! Decodes a manifest with the selected binding and reports whether the job
//! it describes would be handed to the multi-cluster controller. Works
//! offline.

use std::path::PathBuf;

use clap::Args;
use tether_adapter::ownership::ownership_of;
use tether_adapter::{JobBinding, MultiClusterAdapter, Ownership};
use tether_common::kube_utils::parse_dynamic_object;

use super::managed::render;
use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Manifest file (YAML or JSON)
    #[arg(short, long)]
    pub file: PathBuf,
}

pub fn run<B: JobBinding>(adapter: &MultiClusterAdapter<B>, args: CheckArgs) -> Result<()> {
    let manifest = std::fs::read_to_string(&args.file).map_err(|e| Error::io(&args.file, e))?;
    let ownership = check_manifest(adapter, &manifest)?;
    println!("{} {}", args.file.display(), render(&ownership));
    Ok(())
}

/// Ownership of the job described by `manifest`
pub fn check_manifest<B: JobBinding>(
    adapter: &MultiClusterAdapter<B>,
    manifest: &str,
) -> Result<Ownership> {
    let obj = parse_dynamic_object(manifest)?;
    let job = adapter.job_from_object(&obj)?;
    Ok(ownership_of(&job))
}
