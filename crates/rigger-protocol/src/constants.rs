//! Wire-level constants shared between the portal and the cluster runtime.

/// First line of an auto-generated custom storage command section.
pub const CUSTOM_STORAGE_BEGIN: &str = "# RIGGER_CUSTOM_STORAGE_BEGIN";
/// Last line of an auto-generated custom storage command section.
pub const CUSTOM_STORAGE_END: &str = "# RIGGER_CUSTOM_STORAGE_END";

/// First line of an auto-generated team data mount section.
pub const TEAM_DATA_BEGIN: &str = "# RIGGER_DATA_BEGIN";
/// Last line of an auto-generated team data mount section.
pub const TEAM_DATA_END: &str = "# RIGGER_DATA_END";

/// First line of the auto-generated TensorBoard launcher section.
pub const TENSORBOARD_BEGIN: &str = "# RIGGER_TENSORBOARD_BEGIN";
/// Last line of the auto-generated TensorBoard launcher section.
pub const TENSORBOARD_END: &str = "# RIGGER_TENSORBOARD_END";

/// Notice line inserted right after a begin sentinel.
pub const AUTO_GENERATED_NOTICE: &str = "# auto generated section, do not edit";

/// Log directory offered when the user enables TensorBoard without
/// configuring one.
pub const DEFAULT_TENSORBOARD_LOG_PATH: &str = "/mnt/tensorboard";

/// Extras key the runtime reads the selected storage config names from.
pub const STORAGE_CONFIGS_KEY: &str = "storageConfigs";

/// Literal the cluster API substitutes for a stored secrets block when a
/// job config is fetched without secret access.
pub const SECRET_REDACTION_MARKER: &str = "******";

/// Virtual cluster every job falls back to.
pub const DEFAULT_VIRTUAL_CLUSTER: &str = "default";

/// Environment variable the runtime exposes the allocated port list under.
pub fn port_list_env(port_name: &str) -> String {
    format!("RIGGER_CONTAINER_HOST_{port_name}_PORT_LIST")
}
