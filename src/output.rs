use crate::colors::Colors;
use crate::error::Error;
use crate::properties::PropertySet;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    /// `key=value` lines, with `[path]` headers for several files
    Normal,
    /// Only errors
    Quiet,
    /// One JSON array on stdout
    Json,
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub colors: Colors,
    pub show_progress: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, use_colors: bool, show_progress: bool) -> Self {
        Self {
            mode,
            colors: Colors::new(use_colors),
            show_progress,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub files_resolved: usize,
    pub files_failed: usize,
    pub cancelled: bool,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.files_failed > 0 || self.cancelled
    }
}

/// One element of the `--json` array.
#[derive(Debug, Serialize)]
pub struct JsonEntry {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub settings: Option<PropertySet>,
}

/// Render settings the way the EditorConfig command-line tools do.
pub fn format_properties(
    path: &Path,
    props: &PropertySet,
    show_header: bool,
    colors: &Colors,
) -> String {
    let mut out = String::new();
    if show_header {
        out.push_str(&colors.paint(colors.header, &format!("[{}]", path.display())));
        out.push('\n');
    }
    for (key, value) in props.iter() {
        out.push_str(&format!("{}={value}\n", colors.paint(colors.key, key)));
    }
    out
}

pub fn print_properties(path: &Path, props: &PropertySet, show_header: bool, ctx: &OutputContext) {
    if ctx.mode != OutputMode::Normal {
        return;
    }
    print!("{}", format_properties(path, props, show_header, &ctx.colors));
}

pub fn print_error(path: &Path, error: &Error, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Json {
        return;
    }
    eprintln!(
        "{}Error:{} {}: {error}",
        ctx.colors.error,
        ctx.colors.reset(),
        path.display()
    );
}

pub fn print_json(entries: &[JsonEntry]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(entries).map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

pub fn print_summary(result: &RunResult, ctx: &OutputContext) {
    if ctx.mode != OutputMode::Normal {
        return;
    }

    if result.cancelled {
        eprintln!(
            "{}Cancelled{} after {} files",
            ctx.colors.warning,
            ctx.colors.reset(),
            result.files_resolved + result.files_failed
        );
    }
    if result.files_failed > 0 {
        eprintln!(
            "{}{} files failed{}",
            ctx.colors.error,
            result.files_failed,
            ctx.colors.reset()
        );
    }
}
