//! RenderOptions - renderer settings
//!
//! Loadable from TOML/JSON; every key is optional.

use serde::{Deserialize, Serialize};

/// Header line written at the top of every rendered file
pub const DEFAULT_HEADER: &str =
    "// Warning: this file is automatically generated. Don't edit by hand!";

/// Settings for the declaration renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Name of the outer `declare module` block
    #[serde(default = "default_module_name")]
    pub module_name: String,

    /// Leading comment; empty string renders no header
    #[serde(default = "default_header")]
    pub header: String,

    /// DOM type accepted as the `node` init argument
    #[serde(default = "default_node_type")]
    pub node_type: String,
}

fn default_module_name() -> String {
    "Elm".to_string()
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

fn default_node_type() -> String {
    "HTMLElement".to_string()
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_name: default_module_name(),
            header: default_header(),
            node_type: default_node_type(),
        }
    }
}
