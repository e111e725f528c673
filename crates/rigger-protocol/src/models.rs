//! Form-model constructors the submission UI builds its state from.

use crate::constants::DEFAULT_VIRTUAL_CLUSTER;
use crate::document::{JobProtocol, Secrets, TaskRoleSpec};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Job-level fields of the submission form.
#[derive(Debug, Clone, PartialEq)]
pub struct JobBasicInfo {
    pub name: String,
    pub job_type: Option<String>,
    pub virtual_cluster: String,
}

impl JobBasicInfo {
    /// Build from a protocol document. A document without a recorded
    /// virtual cluster lands on the default one.
    pub fn from_protocol(protocol: &JobProtocol) -> Self {
        let virtual_cluster = protocol
            .defaults
            .as_ref()
            .and_then(|d| d.virtual_cluster.clone())
            .unwrap_or_else(|| DEFAULT_VIRTUAL_CLUSTER.to_string());

        Self {
            name: protocol.name.clone(),
            job_type: protocol.job_type.clone(),
            virtual_cluster,
        }
    }
}

/// Per-role fields of the submission form.
#[derive(Debug, Clone, PartialEq)]
pub struct JobTaskRole {
    pub name: String,
    pub instances: u32,
    /// Image uri resolved through the docker image prerequisites, or the
    /// raw reference when no prerequisite matches.
    pub docker_image: String,
    pub commands: Vec<String>,
    pub ports: HashMap<String, u32>,
    /// Commands a deployment runs before/after the role's own commands.
    pub pre_commands: Vec<String>,
    pub post_commands: Vec<String>,
    /// Secrets visible to the role's auth form section. Empty when the
    /// document carries none or the block is redacted.
    pub secrets: Map<String, Value>,
}

impl JobTaskRole {
    pub fn from_protocol(
        name: &str,
        spec: &TaskRoleSpec,
        deployments: &[Value],
        prerequisites: &[Value],
        secrets: Option<&Secrets>,
    ) -> Self {
        let docker_image = resolve_docker_image(&spec.docker_image, prerequisites);
        let (pre_commands, post_commands) = deployment_commands(name, deployments);

        let secrets = match secrets {
            Some(Secrets::Values(map)) => map.clone(),
            _ => Map::new(),
        };

        Self {
            name: name.to_string(),
            instances: spec.instances,
            docker_image,
            commands: spec.commands.clone(),
            ports: spec.resource_per_instance.ports.clone(),
            pre_commands,
            post_commands,
            secrets,
        }
    }
}

fn resolve_docker_image(reference: &str, prerequisites: &[Value]) -> String {
    prerequisites
        .iter()
        .find(|p| {
            p.get("type").and_then(Value::as_str) == Some("dockerimage")
                && p.get("name").and_then(Value::as_str) == Some(reference)
        })
        .and_then(|p| p.get("uri").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| reference.to_string())
}

/// Pull a role's pre/post commands out of the first deployment that
/// mentions it.
fn deployment_commands(role: &str, deployments: &[Value]) -> (Vec<String>, Vec<String>) {
    for deployment in deployments {
        let Some(entry) = deployment
            .get("taskRoles")
            .and_then(|roles| roles.get(role))
        else {
            continue;
        };
        let pre = string_seq(entry.get("preCommands"));
        let post = string_seq(entry.get("postCommands"));
        return (pre, post);
    }
    (Vec::new(), Vec::new())
}

fn string_seq(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_with_commands(commands: &[&str]) -> TaskRoleSpec {
        TaskRoleSpec {
            docker_image: "base".to_string(),
            commands: commands.iter().map(|c| c.to_string()).collect(),
            ..TaskRoleSpec::default()
        }
    }

    #[test]
    fn test_docker_image_resolution() {
        let prerequisites = vec![
            json!({"type": "script", "name": "base", "uri": "not-an-image"}),
            json!({"type": "dockerimage", "name": "base", "uri": "registry/base:1.0"}),
        ];
        let role = JobTaskRole::from_protocol(
            "worker",
            &spec_with_commands(&["python train.py"]),
            &[],
            &prerequisites,
            None,
        );
        assert_eq!(role.docker_image, "registry/base:1.0");
    }

    #[test]
    fn test_docker_image_falls_back_to_reference() {
        let role =
            JobTaskRole::from_protocol("worker", &spec_with_commands(&[]), &[], &[], None);
        assert_eq!(role.docker_image, "base");
    }

    #[test]
    fn test_deployment_commands() {
        let deployments = vec![json!({
            "name": "default",
            "taskRoles": {
                "worker": {
                    "preCommands": ["mount /data"],
                    "postCommands": ["sync"]
                }
            }
        })];
        let role = JobTaskRole::from_protocol(
            "worker",
            &spec_with_commands(&["python train.py"]),
            &deployments,
            &[],
            None,
        );
        assert_eq!(role.pre_commands, ["mount /data"]);
        assert_eq!(role.post_commands, ["sync"]);

        let other = JobTaskRole::from_protocol(
            "ps",
            &spec_with_commands(&[]),
            &deployments,
            &[],
            None,
        );
        assert!(other.pre_commands.is_empty());
        assert!(other.post_commands.is_empty());
    }

    #[test]
    fn test_redacted_secrets_are_dropped() {
        let secrets = Secrets::Redacted("******".to_string());
        let role = JobTaskRole::from_protocol(
            "worker",
            &spec_with_commands(&[]),
            &[],
            &[],
            Some(&secrets),
        );
        assert!(role.secrets.is_empty());
    }

    #[test]
    fn test_basic_info_defaults_virtual_cluster() {
        let protocol = JobProtocol::from_json_str(r#"{"name": "j"}"#).unwrap();
        let info = JobBasicInfo::from_protocol(&protocol);
        assert_eq!(info.virtual_cluster, "default");
    }
}
