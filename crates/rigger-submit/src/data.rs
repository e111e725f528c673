//! External job-data provider seam.
//!
//! The portal's data plugin knows which storage configs the user selected
//! and how to turn them into mount pre-commands. The generation call may
//! hit the cluster's storage service, so it is async; the caller awaits it
//! before touching the document again.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to generate data commands: {0}")]
    CommandGeneration(String),
}

/// A selectable storage mount config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    pub name: String,
}

/// The user's mount selection.
#[derive(Debug, Clone, Default)]
pub struct MountDirectories {
    pub selected_configs: Vec<MountConfig>,
}

impl MountDirectories {
    pub fn selected_names(&self) -> Vec<String> {
        self.selected_configs
            .iter()
            .map(|config| config.name.clone())
            .collect()
    }
}

/// Supplier of data-mount pre-commands.
///
/// Callers hold a concrete provider, so the future's auto traits are left
/// to the implementation.
#[allow(async_fn_in_trait)]
pub trait JobDataProvider {
    /// Whether the user selected any data to mount.
    fn contains_data(&self) -> bool;

    fn mount_dirs(&self) -> Option<&MountDirectories>;

    /// Pre-commands to prepend to every task role, already wrapped in
    /// their sentinel markers by the provider.
    async fn generate_data_commands(
        &self,
        user: &str,
        job_name: &str,
    ) -> Result<Vec<String>, DataError>;
}
