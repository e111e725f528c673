//! Document transformer for the job submission portal.
//!
//! Converts between wire-level job protocol documents and the editable
//! form model, and injects/strips the auto-generated command sections
//! (data mounts, TensorBoard launcher) in task role command lists.

pub mod compose;
pub mod data;
pub mod naming;
pub mod sections;
pub mod tensorboard;

pub use compose::{
    job_components_from_protocol, populate_protocol_with_data_and_tensorboard, ComposeWarning,
    JobComponents, KeyValue, SubmissionContext,
};
pub use data::{DataError, JobDataProvider, MountConfig, MountDirectories};
pub use naming::create_unique_name;
pub use sections::{find_section, strip_generated_sections, strip_section, Section, SectionKind};
pub use tensorboard::{
    generate_default_tensorboard_extras, is_valid_updated_tensorboard_extras,
    tensorboard_command_block, tensorboard_port_name,
};
