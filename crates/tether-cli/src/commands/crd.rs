//! CRD command

use kube::CustomResourceExt;
use tether_common::crd::PaddleJob;

use crate::Result;

/// Print the PaddleJob CRD as YAML
pub fn run() -> Result<()> {
    print!("{}", render()?);
    Ok(())
}

fn render() -> Result<String> {
    Ok(serde_yaml::to_string(&PaddleJob::crd())?)
}
