//! Upward discovery of config files

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::cache::ParseCache;
use crate::error::Error;
use crate::parser::{parse_file, ConfigFile, ParseMode};

/// Default config file name
pub const EDITORCONFIG_FILE_NAME: &str = ".editorconfig";

/// Options controlling the upward walk.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Name of the config file looked up in each directory
    pub file_name: String,
    /// Last directory searched, if it is an ancestor of the target
    pub stop_at: Option<PathBuf>,
    pub mode: ParseMode,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            file_name: EDITORCONFIG_FILE_NAME.to_string(),
            stop_at: None,
            mode: ParseMode::default(),
        }
    }
}

/// Candidate config paths from a start directory upward.
///
/// Lazy and cheap to clone, so a walk can be restarted from any point.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    next: Option<&'a Path>,
    file_name: &'a str,
    stop_at: Option<&'a Path>,
}

impl Iterator for Candidates<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let dir = self.next?;
        self.next = if self.stop_at == Some(dir) {
            None
        } else {
            dir.parent()
        };
        Some(dir.join(self.file_name))
    }
}

/// Candidate paths for `file_name` in `start_dir` and each of its ancestors.
///
/// If `stop_at` is one of those directories, it is the last one yielded.
pub fn candidates<'a>(
    start_dir: &'a Path,
    file_name: &'a str,
    stop_at: Option<&'a Path>,
) -> Candidates<'a> {
    Candidates {
        next: Some(start_dir),
        file_name,
        stop_at,
    }
}

/// Config files that apply to one target, outermost first.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    files: Vec<Arc<ConfigFile>>,
}

impl Discovery {
    pub fn files(&self) -> &[Arc<ConfigFile>] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<ConfigFile>> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a Discovery {
    type Item = &'a Arc<ConfigFile>;
    type IntoIter = std::slice::Iter<'a, Arc<ConfigFile>>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Find and parse the config files applying to the absolute path `target`.
///
/// Walks from the target's directory upward and stops after the first file
/// whose preamble sets `root = true`, or after `stop_at`.
pub fn discover(
    target: &Path,
    options: &WalkOptions,
    cache: Option<&ParseCache>,
) -> Result<Discovery, Error> {
    let start = target
        .parent()
        .ok_or_else(|| Error::invalid_path(target, "path has no parent directory"))?;

    let mut visited = HashSet::new();
    let mut files = Vec::new();

    for candidate in candidates(start, &options.file_name, options.stop_at.as_deref()) {
        if !visited.insert(candidate.clone()) {
            continue;
        }

        match fs::metadata(&candidate) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => continue,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(Error::io(&candidate, e)),
        }

        let file = match cache {
            Some(cache) => cache.get_or_parse(&candidate, options.mode)?,
            None => Arc::new(parse_file(&candidate, options.mode)?),
        };
        let root = file.is_root();
        files.push(file);

        if root {
            debug!(path = %candidate.display(), "root config file, stopping walk");
            break;
        }
    }

    files.reverse();
    debug!(target = %target.display(), found = files.len(), "discovered config files");
    Ok(Discovery { files })
}
