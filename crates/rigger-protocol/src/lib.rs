//! Job protocol document model for rigger.
//!
//! This crate owns the wire-level representation of a job specification
//! and the form-model constructors the submission UI builds its state from.

pub mod constants;
pub mod document;
pub mod models;

pub use document::{
    Extras, JobDefaults, JobProtocol, ProtocolError, ResourcePerInstance, Secrets, TaskRole,
    TaskRoleSpec, TaskRoles, TensorBoardExtras,
};
pub use models::{JobBasicInfo, JobTaskRole};
