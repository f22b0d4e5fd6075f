//! TOML schema definitions for ecfg.toml

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root structure for ecfg.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EcfgToml {
    /// Resolution settings
    #[serde(default)]
    pub resolve: ResolveSection,
}

/// `[resolve]` section in ecfg.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveSection {
    /// Treat malformed lines as errors (default: false)
    pub strict: Option<bool>,

    /// Config file name to look for (default: .editorconfig)
    pub file_name: Option<String>,

    /// Never search above this directory (default: filesystem root)
    pub stop_at: Option<PathBuf>,

    /// Fill in implied indent_size/tab_width values (default: false)
    pub implied_values: Option<bool>,
}
