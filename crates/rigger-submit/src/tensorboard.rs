//! TensorBoard integration helpers.

use rand::Rng;
use rigger_protocol::constants::{
    port_list_env, AUTO_GENERATED_NOTICE, DEFAULT_TENSORBOARD_LOG_PATH, TENSORBOARD_BEGIN,
    TENSORBOARD_END,
};
use rigger_protocol::TensorBoardExtras;
use serde_json::{Map, Value};

const RANDOM_SUFFIX_LEN: usize = 8;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 8 lowercase-alphanumeric characters.
pub fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..RANDOM_SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// A fresh extras record: a random identifier plus a single `default` log
/// directory at the well-known path.
pub fn generate_default_tensorboard_extras() -> TensorBoardExtras {
    let mut log_directories = Map::new();
    log_directories.insert(
        "default".to_string(),
        Value::String(DEFAULT_TENSORBOARD_LOG_PATH.to_string()),
    );
    TensorBoardExtras {
        random_str: random_suffix(),
        log_directories,
    }
}

/// Port name the launcher binds, unique per document via the random
/// identifier.
pub fn tensorboard_port_name(random_str: &str) -> String {
    format!("tensorboard_{random_str}")
}

/// The 4-line command block prepended to the first task role: begin
/// sentinel, notice, backgrounded launcher, end sentinel.
pub fn tensorboard_command_block(extras: &TensorBoardExtras) -> Vec<String> {
    let log_dirs = extras
        .log_directories
        .iter()
        .filter_map(|(name, path)| path.as_str().map(|p| format!("{name}:{p}")))
        .collect::<Vec<_>>()
        .join(",");
    let port_env = port_list_env(&tensorboard_port_name(&extras.random_str));

    vec![
        TENSORBOARD_BEGIN.to_string(),
        AUTO_GENERATED_NOTICE.to_string(),
        format!("tensorboard --logdir={log_dirs} --port=${{{port_env}}} &"),
        TENSORBOARD_END.to_string(),
    ]
}

/// Validate a user-edited extras record against the original: the
/// identifier must be unchanged, `logDirectories` must still be a
/// non-empty object, and no extra top-level fields may appear.
pub fn is_valid_updated_tensorboard_extras(
    original: &TensorBoardExtras,
    updated: &Value,
) -> bool {
    let Some(fields) = updated.as_object() else {
        return false;
    };
    if fields.len() != 2 {
        return false;
    }
    if fields.get("randomStr").and_then(Value::as_str) != Some(original.random_str.as_str()) {
        return false;
    }
    match fields.get("logDirectories").and_then(Value::as_object) {
        Some(dirs) => !dirs.is_empty(),
        None => false,
    }
}
