//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file::CONFIG_FILE_NAME;

/// Template ecfg.toml with documentation
pub const ECFG_TOML_TEMPLATE: &str = r#"# ecfg.toml - Configuration for the ecfg EditorConfig resolver
#
# ecfg prints the effective EditorConfig settings of files by reading
# every applicable .editorconfig from the file's directory upward.
#
# Command-line flags override the settings below; uncomment and modify
# as needed.

[resolve]
# Report malformed lines in .editorconfig files as errors instead of
# skipping them.
# Default: false
# strict = false

# Name of the config files to look for in each directory.
# Default: ".editorconfig"
# file_name = ".editorconfig"

# Never search above this directory. Relative paths are taken relative
# to this file.
# stop_at = "."

# Fill in values implied by related properties, e.g. tab_width from a
# numeric indent_size.
# Default: false
# implied_values = false
"#;

/// Generate ecfg.toml in the specified directory (or current directory if None).
///
/// Returns an error if ecfg.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), |d| d.join(CONFIG_FILE_NAME));

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{CONFIG_FILE_NAME} already exists"),
        ));
    }

    fs::write(&path, ECFG_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate ecfg.toml in the current directory.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
