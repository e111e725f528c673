//! Decompose a protocol document into form components and recompose the
//! generated command sections before submission.

use crate::data::{DataError, JobDataProvider};
use crate::sections::strip_generated_sections;
use crate::tensorboard::{tensorboard_command_block, tensorboard_port_name};
use rigger_protocol::constants::DEFAULT_VIRTUAL_CLUSTER;
use rigger_protocol::{Extras, JobBasicInfo, JobProtocol, JobTaskRole, Secrets};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Cluster-side facts the form needs while decomposing a document.
#[derive(Debug, Clone, Default)]
pub struct SubmissionContext {
    /// Virtual clusters the user may submit to.
    pub virtual_clusters: Vec<String>,
}

/// A mapping entry flattened for list-shaped form editors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: Value,
}

fn pairs(map: &Map<String, Value>) -> Vec<KeyValue> {
    map.iter()
        .map(|(key, value)| KeyValue {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Non-fatal conditions the UI should surface to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeWarning {
    /// The cluster returned the redaction marker in place of the stored
    /// secrets; the user must re-enter them before submitting.
    SecretsRedacted,
}

impl fmt::Display for ComposeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecretsRedacted => {
                write!(f, "stored secrets were redacted and are not editable; re-enter them before submitting")
            }
        }
    }
}

/// The editable pieces of a job document.
#[derive(Debug, Clone)]
pub struct JobComponents {
    pub job_info: JobBasicInfo,
    pub task_roles: Vec<JobTaskRole>,
    pub parameters: Vec<KeyValue>,
    pub secrets: Vec<KeyValue>,
    pub extras: Option<Extras>,
    pub warnings: Vec<ComposeWarning>,
}

/// Decompose a document into form components.
///
/// Generated command sections are stripped from a working copy first, so
/// only user-authored commands reach the form; a document without
/// well-formed generated sections decomposes without altering any
/// command. Returns None when there is no document.
pub fn job_components_from_protocol(
    protocol: Option<&JobProtocol>,
    context: &SubmissionContext,
) -> Option<JobComponents> {
    let mut protocol = protocol?.clone();
    strip_generated_sections(&mut protocol);

    let mut job_info = JobBasicInfo::from_protocol(&protocol);
    if !context
        .virtual_clusters
        .iter()
        .any(|vc| *vc == job_info.virtual_cluster)
    {
        job_info.virtual_cluster = DEFAULT_VIRTUAL_CLUSTER.to_string();
    }

    let mut warnings = Vec::new();
    let secrets = match &protocol.secrets {
        Some(secrets) if secrets.is_redacted() => {
            tracing::warn!(job = %protocol.name, "secrets block was redacted by the cluster");
            warnings.push(ComposeWarning::SecretsRedacted);
            Vec::new()
        }
        Some(Secrets::Values(map)) => pairs(map),
        Some(Secrets::Redacted(_)) | None => Vec::new(),
    };

    let task_roles = protocol
        .task_roles
        .iter()
        .map(|role| {
            JobTaskRole::from_protocol(
                &role.name,
                &role.spec,
                &protocol.deployments,
                &protocol.prerequisites,
                protocol.secrets.as_ref(),
            )
        })
        .collect();

    Some(JobComponents {
        job_info,
        task_roles,
        parameters: pairs(&protocol.parameters),
        secrets,
        extras: protocol.extras.clone(),
        warnings,
    })
}

/// Inject the generated command sections into a document about to be
/// submitted.
///
/// When the document declares a TensorBoard extras block, its launcher
/// block is prepended to the first task role and the derived port is
/// registered there. When the provider has data to mount, its
/// pre-commands are prepended to every task role and the selected config
/// names are recorded in the extras. Mutates the document in place.
pub async fn populate_protocol_with_data_and_tensorboard<P>(
    user: &str,
    protocol: &mut JobProtocol,
    provider: &P,
) -> Result<(), DataError>
where
    P: JobDataProvider,
{
    if let Some(tensor_board) = protocol
        .extras
        .as_ref()
        .and_then(|extras| extras.tensor_board.clone())
    {
        let port = tensorboard_port_name(&tensor_board.random_str);
        let block = tensorboard_command_block(&tensor_board);
        if let Some(first) = protocol.task_roles.first_mut() {
            first.spec.commands.splice(0..0, block);
            first.spec.resource_per_instance.ports.insert(port, 1);
        }
    }

    if !provider.contains_data() {
        return Ok(());
    }

    let pre_commands = provider
        .generate_data_commands(user, &protocol.name)
        .await?;
    for role in protocol.task_roles.iter_mut() {
        role.spec.commands.splice(0..0, pre_commands.iter().cloned());
    }

    if let Some(extras) = protocol.extras.as_mut() {
        let selected = provider
            .mount_dirs()
            .map(|dirs| dirs.selected_names())
            .unwrap_or_default();
        extras.storage_configs = Some(selected);
    }

    Ok(())
}
