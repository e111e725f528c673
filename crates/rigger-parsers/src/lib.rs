//! Shared parsing utilities for the submission UI.

pub mod path;
pub mod url;
pub mod value;

pub use path::{add_path_prefix, remove_path_prefix};
pub use url::{file_name_from_http, hostname_from_uri, port_from_uri};
pub use value::{merge_mappings, prune_empty_values};
