//! Typed wire model for job specification documents.
//!
//! Documents arrive as JSON produced by the cluster's config parser. The
//! model keeps unknown fields (flattened trailing maps) and mapping order
//! so an edited document can be written back without churn.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A job specification document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProtocol {
    #[serde(
        rename = "protocolVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub protocol_version: Option<String>,

    /// Job name, unique within a user's namespace.
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,

    /// Ordered prerequisite records. A `type == "dockerimage"` entry maps a
    /// reference name to an image uri.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<Value>,

    /// Free-form job parameters, in document order.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Secrets>,

    #[serde(rename = "taskRoles", default, skip_serializing_if = "TaskRoles::is_empty")]
    pub task_roles: TaskRoles,

    /// Ordered deployment records carrying per-role pre/post commands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployments: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<JobDefaults>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Extras>,

    /// Top-level fields this crate does not interpret.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl JobProtocol {
    /// Parse a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize back to compact JSON.
    pub fn to_json_string(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize back to pretty-printed JSON for the config editor.
    pub fn to_json_string_pretty(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A secrets block. The cluster API replaces the whole block with a
/// redaction marker when the caller has no secret access, so the wire
/// value is either a mapping or a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Secrets {
    Values(Map<String, Value>),
    Redacted(String),
}

impl Secrets {
    /// Whether this block is the exact redaction marker.
    pub fn is_redacted(&self) -> bool {
        matches!(self, Self::Redacted(s) if s == crate::constants::SECRET_REDACTION_MARKER)
    }
}

/// Job-level defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDefaults {
    #[serde(
        rename = "virtualCluster",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub virtual_cluster: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Open side-channel mapping for non-core features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extras {
    #[serde(
        rename = "tensorBoard",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tensor_board: Option<TensorBoardExtras>,

    /// Names of the storage configs selected for mounting. The wire key is
    /// [`crate::constants::STORAGE_CONFIGS_KEY`].
    #[serde(
        rename = "storageConfigs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_configs: Option<Vec<String>>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// TensorBoard side-channel record: exactly these two wire fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorBoardExtras {
    /// Identifier tying the launcher command to its allocated port.
    #[serde(rename = "randomStr")]
    pub random_str: String,

    /// Log directory name -> path, in document order.
    #[serde(rename = "logDirectories")]
    pub log_directories: Map<String, Value>,
}

/// Task roles in document order.
///
/// The wire format is a mapping of role name to spec, but order matters:
/// generated command blocks target the first role. Serde goes through a
/// hand-written map visitor so the order survives a round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRoles(Vec<TaskRole>);

/// A named task role.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRole {
    pub name: String,
    pub spec: TaskRoleSpec,
}

impl TaskRoles {
    pub fn new(roles: Vec<TaskRole>) -> Self {
        Self(roles)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskRole> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, TaskRole> {
        self.0.iter_mut()
    }

    /// The role generated command blocks are prepended to.
    pub fn first_mut(&mut self) -> Option<&mut TaskRole> {
        self.0.first_mut()
    }

    pub fn get(&self, name: &str) -> Option<&TaskRole> {
        self.0.iter().find(|r| r.name == name)
    }

    pub fn push(&mut self, role: TaskRole) {
        self.0.push(role);
    }
}

impl<'a> IntoIterator for &'a TaskRoles {
    type Item = &'a TaskRole;
    type IntoIter = std::slice::Iter<'a, TaskRole>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for TaskRoles {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for role in &self.0 {
            map.serialize_entry(&role.name, &role.spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TaskRoles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RolesVisitor;

        impl<'de> Visitor<'de> for RolesVisitor {
            type Value = TaskRoles;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of task role name to task role spec")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut roles = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, spec)) = access.next_entry::<String, TaskRoleSpec>()? {
                    roles.push(TaskRole { name, spec });
                }
                Ok(TaskRoles(roles))
            }
        }

        deserializer.deserialize_map(RolesVisitor)
    }
}

fn default_instances() -> u32 {
    1
}

fn is_default_instances(n: &u32) -> bool {
    *n == 1
}

/// Per-role spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRoleSpec {
    #[serde(default = "default_instances", skip_serializing_if = "is_default_instances")]
    pub instances: u32,

    /// Reference to a docker image prerequisite by name.
    #[serde(
        rename = "dockerImage",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub docker_image: String,

    #[serde(rename = "resourcePerInstance", default)]
    pub resource_per_instance: ResourcePerInstance,

    /// Shell command lines, run in order inside the container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Default for TaskRoleSpec {
    fn default() -> Self {
        Self {
            instances: default_instances(),
            docker_image: String::new(),
            resource_per_instance: ResourcePerInstance::default(),
            commands: Vec::new(),
            rest: Map::new(),
        }
    }
}

/// Per-instance resource request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePerInstance {
    #[serde(default)]
    pub cpu: u32,

    #[serde(rename = "memoryMB", default)]
    pub memory_mb: u64,

    #[serde(default)]
    pub gpu: u32,

    /// Port name -> number of ports requested.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub ports: HashMap<String, u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SECRET_REDACTION_MARKER;

    const SAMPLE: &str = r#"{
        "protocolVersion": "2",
        "name": "train-mnist",
        "type": "job",
        "prerequisites": [
            {"type": "dockerimage", "name": "base", "uri": "registry/base:1.0"}
        ],
        "parameters": {"epochs": 10, "lr": 0.1},
        "secrets": {"registry_password": "hunter2"},
        "taskRoles": {
            "worker": {
                "instances": 2,
                "dockerImage": "base",
                "resourcePerInstance": {"cpu": 4, "memoryMB": 8192, "gpu": 1},
                "commands": ["python train.py"]
            },
            "ps": {
                "dockerImage": "base",
                "resourcePerInstance": {"cpu": 2, "memoryMB": 4096, "gpu": 0,
                                        "ports": {"sync": 1}},
                "commands": ["python ps.py"]
            }
        },
        "defaults": {"virtualCluster": "gpu-a100"},
        "extras": {"submitFrom": "web-portal"}
    }"#;

    #[test]
    fn test_parse_sample() {
        let protocol = JobProtocol::from_json_str(SAMPLE).unwrap();
        assert_eq!(protocol.name, "train-mnist");
        assert_eq!(protocol.task_roles.len(), 2);

        let worker = protocol.task_roles.get("worker").unwrap();
        assert_eq!(worker.spec.instances, 2);
        assert_eq!(worker.spec.resource_per_instance.memory_mb, 8192);

        let ps = protocol.task_roles.get("ps").unwrap();
        assert_eq!(ps.spec.instances, 1);
        assert_eq!(ps.spec.resource_per_instance.ports.get("sync"), Some(&1));
    }

    #[test]
    fn test_task_role_order_survives_round_trip() {
        let protocol = JobProtocol::from_json_str(SAMPLE).unwrap();
        let names: Vec<&str> = protocol.task_roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["worker", "ps"]);

        let text = protocol.to_json_string().unwrap();
        let reparsed = JobProtocol::from_json_str(&text).unwrap();
        let names: Vec<&str> = reparsed.task_roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["worker", "ps"]);
        assert_eq!(protocol, reparsed);
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let protocol = JobProtocol::from_json_str(SAMPLE).unwrap();
        let extras = protocol.extras.as_ref().unwrap();
        assert_eq!(
            extras.rest.get("submitFrom"),
            Some(&Value::String("web-portal".into()))
        );

        let text = protocol.to_json_string().unwrap();
        assert!(text.contains("submitFrom"));
    }

    #[test]
    fn test_redacted_secrets() {
        let text = SAMPLE.replace(
            r#"{"registry_password": "hunter2"}"#,
            &format!("\"{SECRET_REDACTION_MARKER}\""),
        );
        let protocol = JobProtocol::from_json_str(&text).unwrap();
        assert!(protocol.secrets.as_ref().unwrap().is_redacted());
    }

    #[test]
    fn test_non_marker_string_secrets_not_redacted() {
        let secrets = Secrets::Redacted("oops".into());
        assert!(!secrets.is_redacted());
    }
}
