//! EditorConfig resolution engine.
//!
//! Given a file path, [`resolve`] reads every applicable `.editorconfig`
//! from the file's directory upward (stopping at one marked `root = true`),
//! matches each section's glob against the file, and merges the properties
//! with nearer files and later sections taking precedence.
//!
//! ```no_run
//! let settings = ecfg::resolve("src/main.rs")?;
//! if let Some(width) = settings.tab_width() {
//!     println!("tab width: {width}");
//! }
//! # Ok::<(), ecfg::Error>(())
//! ```

pub mod cache;
pub mod cancel;
pub mod colors;
pub mod config;
pub mod discover;
mod error;
pub mod glob;
mod output;
pub mod parser;
pub mod progress;
mod properties;
mod resolve;
pub mod walker;

pub use cache::ParseCache;
pub use cancel::CancelFlag;
pub use colors::{should_use_colors, Colors};
pub use config::{
    find_config_file, generate_init_file, load_config, merge_resolve_options, CliResolveOptions,
    ConfigError, EcfgToml, ResolveSection, ECFG_TOML_TEMPLATE,
};
pub use discover::{candidates, discover, Discovery, WalkOptions, EDITORCONFIG_FILE_NAME};
pub use error::{CoreError, Error};
pub use glob::{Glob, GlobError};
pub use output::{format_properties, JsonEntry, OutputContext, OutputMode, RunResult};
pub use parser::{parse_file, parse_str, ConfigFile, ParseMode, Section};
pub use progress::ProgressReporter;
pub use properties::{Charset, EndOfLine, IndentSize, IndentStyle, PropertySet, TypedProperties};
pub use resolve::{resolve, ResolveAll, ResolveOptions, Resolver};
pub use walker::walk_paths;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Main entry point: resolve every file named by `paths`
pub fn run(
    paths: &[String],
    options: &ResolveOptions,
    ctx: &OutputContext,
    cancel: &CancelFlag,
) -> io::Result<RunResult> {
    let mut result = RunResult::default();

    let targets: Vec<PathBuf> = walk_paths(paths).collect::<io::Result<_>>()?;
    let show_header = targets.len() > 1;
    let progress = ProgressReporter::new(targets.len() as u64, ctx.show_progress);

    // Sibling files share most of their config files
    let mut options = options.clone();
    options.cache.get_or_insert_with(|| Arc::new(ParseCache::new()));
    let resolver = Resolver::new(options);

    let mut json_entries = Vec::new();

    for (path, resolved) in resolver.resolve_all(targets, cancel) {
        progress.set_path(&path);

        match resolved {
            Ok(props) => {
                result.files_resolved += 1;
                if ctx.mode == OutputMode::Json {
                    json_entries.push(JsonEntry {
                        path,
                        error: None,
                        settings: Some(props),
                    });
                } else {
                    output::print_properties(&path, &props, show_header, ctx);
                }
            }
            Err(e) => {
                result.files_failed += 1;
                output::print_error(&path, &e, ctx);
                if ctx.mode == OutputMode::Json {
                    json_entries.push(JsonEntry {
                        path,
                        error: Some(e.to_string()),
                        settings: None,
                    });
                }
            }
        }

        progress.inc();
    }

    result.cancelled = cancel.is_cancelled();
    progress.finish(result.cancelled);

    if ctx.mode == OutputMode::Json {
        output::print_json(&json_entries)?;
    }
    output::print_summary(&result, ctx);

    Ok(result)
}
