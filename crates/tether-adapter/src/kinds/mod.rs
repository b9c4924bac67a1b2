//! Bindings for the job kinds shipped with the adapter

pub mod batch_job;
pub mod paddlejob;

pub use batch_job::BatchJobBinding;
pub use paddlejob::PaddleJobBinding;
