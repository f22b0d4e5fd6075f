//! Computing the effective settings of a file

use std::env;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::cache::ParseCache;
use crate::cancel::CancelFlag;
use crate::discover::{discover, WalkOptions, EDITORCONFIG_FILE_NAME};
use crate::error::Error;
use crate::parser::ParseMode;
use crate::properties::{apply_implied_values, upsert, PropertySet};

/// Options for a [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub mode: ParseMode,
    /// Name of the config files to look for
    pub file_name: String,
    /// Do not search above this directory
    pub stop_at: Option<PathBuf>,
    /// Fill in `indent_size`/`tab_width` values implied by related properties
    pub implied_values: bool,
    /// Parsed files shared between resolutions
    pub cache: Option<Arc<ParseCache>>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            file_name: EDITORCONFIG_FILE_NAME.to_string(),
            stop_at: None,
            implied_values: false,
            cache: None,
        }
    }
}

/// Resolves the effective EditorConfig settings of files.
///
/// Holds no mutable state besides the optional shared cache, so one
/// resolver can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolveOptions,
}

impl Resolver {
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Compute the settings for `target`.
    ///
    /// Files nearer the target override farther ones, and within a file
    /// later matching sections override earlier ones. Any I/O failure, or
    /// a malformed line in strict mode, fails the whole call.
    pub fn resolve(&self, target: impl AsRef<Path>) -> Result<PropertySet, Error> {
        let target = absolutize(target.as_ref())?;
        if target.file_name().is_none() {
            return Err(Error::invalid_path(&target, "path has no file name"));
        }
        let stop_at = match &self.options.stop_at {
            Some(dir) => Some(absolutize(dir)?),
            None => None,
        };

        let walk = WalkOptions {
            file_name: self.options.file_name.clone(),
            stop_at,
            mode: self.options.mode,
        };
        let discovery = discover(&target, &walk, self.options.cache.as_deref())?;

        let mut merged: Vec<(String, String)> = Vec::new();
        let mut config_file = None;

        for file in &discovery {
            let relative = relative_path(&target, file.dir())?;
            let mut contributed = false;

            for section in file.sections() {
                if !section.matches(&relative) {
                    continue;
                }
                debug!(
                    file = %file.path().display(),
                    pattern = section.pattern().unwrap_or("<preamble>"),
                    "section matches"
                );
                for (key, value) in section.properties() {
                    upsert(&mut merged, key, value);
                    contributed = true;
                }
            }

            if contributed {
                config_file = Some(file.path().to_path_buf());
            }
        }

        if self.options.implied_values {
            apply_implied_values(&mut merged);
        }

        Ok(PropertySet::new(merged, config_file))
    }

    /// Resolve many targets lazily, stopping once `cancel` is set.
    ///
    /// Each item carries its own result; a failure for one target does not
    /// stop the batch.
    pub fn resolve_all<I>(&self, targets: I, cancel: &CancelFlag) -> ResolveAll<'_, I::IntoIter>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        ResolveAll {
            resolver: self,
            targets: targets.into_iter(),
            cancel: cancel.clone(),
        }
    }
}

/// Iterator returned by [`Resolver::resolve_all`].
pub struct ResolveAll<'r, I> {
    resolver: &'r Resolver,
    targets: I,
    cancel: CancelFlag,
}

impl<I: Iterator<Item = PathBuf>> Iterator for ResolveAll<'_, I> {
    type Item = (PathBuf, Result<PropertySet, Error>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cancel.is_cancelled() {
            debug!("batch resolution cancelled");
            return None;
        }
        let target = self.targets.next()?;
        let result = self.resolver.resolve(&target);
        Some((target, result))
    }
}

/// Resolve `target` with default options.
pub fn resolve(target: impl AsRef<Path>) -> Result<PropertySet, Error> {
    Resolver::default().resolve(target)
}

/// Make `path` absolute and collapse `.` and `..` components lexically.
fn absolutize(path: &Path) -> Result<PathBuf, Error> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }

    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| Error::io(path, e))?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    Ok(normalized)
}

/// `target` relative to `dir`, with `/` separators.
fn relative_path(target: &Path, dir: &Path) -> Result<String, Error> {
    let rest = target
        .strip_prefix(dir)
        .map_err(|_| Error::invalid_path(target, "path is outside the config directory"))?;

    let parts: Vec<_> = rest
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Ok(parts.join("/"))
}
