//! Type bindings: the kind-specific half of the adapter
//!
//! A binding supplies the five operations the generic engine cannot do on
//! its own. It can be written as a [`JobBinding`] impl or assembled from
//! plain functions with [`FnBinding`].

use kube::api::{DynamicObject, GroupVersionKind};

use crate::error::AdapterError;
use crate::job::ManagedJob;

/// Kind-specific operations for one job kind
pub trait JobBinding: Send + Sync {
    type Job: ManagedJob;

    /// Group, version and kind of the bound type
    fn gvk(&self) -> GroupVersionKind;

    /// Typed view of a generic object, or `TypeMismatch` if it is another kind
    fn from_object(&self, obj: &DynamicObject) -> Result<Self::Job, AdapterError>;

    /// A fresh, empty list for this kind
    fn empty_list(&self) -> JobList<Self::Job> {
        JobList::new(self.gvk())
    }

    /// Overwrite `dst`'s spec with `src`'s. Must not touch metadata or status.
    fn copy_spec(&self, dst: &mut Self::Job, src: &Self::Job);

    /// Overwrite `dst`'s status with `src`'s. Must not touch metadata or spec.
    fn copy_status(&self, dst: &mut Self::Job, src: &Self::Job);
}

/// Items of one kind, tagged with the kind they hold
#[derive(Clone, Debug)]
pub struct JobList<J> {
    pub gvk: GroupVersionKind,
    pub items: Vec<J>,
}

impl<J> JobList<J> {
    pub fn new(gvk: GroupVersionKind) -> Self {
        Self {
            gvk,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Binding assembled from five functions
pub struct FnBinding<J> {
    pub copy_spec: fn(&mut J, &J),
    pub copy_status: fn(&mut J, &J),
    pub empty_list: fn() -> JobList<J>,
    pub gvk: fn() -> GroupVersionKind,
    pub from_object: fn(&DynamicObject) -> Result<J, AdapterError>,
}

impl<J: ManagedJob> JobBinding for FnBinding<J> {
    type Job = J;

    fn gvk(&self) -> GroupVersionKind {
        (self.gvk)()
    }

    fn from_object(&self, obj: &DynamicObject) -> Result<J, AdapterError> {
        (self.from_object)(obj)
    }

    fn empty_list(&self) -> JobList<J> {
        (self.empty_list)()
    }

    fn copy_spec(&self, dst: &mut J, src: &J) {
        (self.copy_spec)(dst, src)
    }

    fn copy_status(&self, dst: &mut J, src: &J) {
        (self.copy_status)(dst, src)
    }
}

/// `apiVersion` string for a GVK (`v1` for the core group)
pub fn api_version(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        gvk.version.clone()
    } else {
        format!("{}/{}", gvk.group, gvk.version)
    }
}

/// `group/version/Kind` rendering used in diagnostics
pub fn describe_gvk(gvk: &GroupVersionKind) -> String {
    format!("{}/{}", api_version(gvk), gvk.kind)
}

/// Decode a generic object into `J` after checking its apiVersion and kind.
///
/// Shared by the bindings in [`crate::kinds`].
pub fn decode_object<J: ManagedJob>(
    obj: &DynamicObject,
    gvk: &GroupVersionKind,
) -> Result<J, AdapterError> {
    let expected = describe_gvk(gvk);
    let types = obj.types.as_ref().ok_or_else(|| AdapterError::TypeMismatch {
        expected: expected.clone(),
        found: "object without apiVersion/kind".to_string(),
    })?;
    let found = format!("{}/{}", types.api_version, types.kind);
    if types.api_version != api_version(gvk) || types.kind != gvk.kind {
        return Err(AdapterError::TypeMismatch { expected, found });
    }

    let value = serde_json::to_value(obj)?;
    serde_json::from_value(value).map_err(|e| AdapterError::TypeMismatch {
        expected,
        found: format!("{} that does not decode: {}", found, e),
    })
}
