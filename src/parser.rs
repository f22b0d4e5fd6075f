//! `.editorconfig` file parsing

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Error;
use crate::glob::Glob;

/// Longest accepted section pattern
pub const MAX_SECTION_LEN: usize = 4096;
/// Longest accepted property name
pub const MAX_KEY_LEN: usize = 1024;
/// Longest accepted property value
pub const MAX_VALUE_LEN: usize = 4096;

/// Keys whose values are lower-cased on read.
const CASE_FOLDED_KEYS: &[&str] = &[
    "indent_style",
    "indent_size",
    "tab_width",
    "end_of_line",
    "charset",
    "trim_trailing_whitespace",
    "insert_final_newline",
    "root",
];

/// How malformed lines are handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Skip malformed lines and keep going
    #[default]
    Lenient,
    /// Fail on the first malformed line
    Strict,
}

/// A glob pattern and the properties it assigns.
#[derive(Debug, Clone)]
pub struct Section {
    /// `None` for the properties above the first section header
    pattern: Option<String>,
    /// `None` when the pattern failed to compile; such a section never matches
    glob: Option<Glob>,
    properties: Vec<(String, String)>,
}

impl Section {
    fn preamble() -> Self {
        Self {
            pattern: None,
            glob: None,
            properties: Vec::new(),
        }
    }

    fn with_pattern(pattern: &str) -> Self {
        let glob = match Glob::section(pattern) {
            Ok(glob) => Some(glob),
            Err(e) => {
                warn!("{e}");
                None
            }
        };
        Self {
            pattern: Some(pattern.to_string()),
            glob,
            properties: Vec::new(),
        }
    }

    /// The header pattern, or `None` for the top-level preamble.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Properties in the order they first appear.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Test a path relative to the config file's directory.
    pub fn matches(&self, relative_path: &str) -> bool {
        match (&self.pattern, &self.glob) {
            (None, _) => true,
            (Some(_), Some(glob)) => glob.is_match(relative_path),
            (Some(_), None) => false,
        }
    }

    fn insert(&mut self, key: String, value: String) {
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((key, value)),
        }
    }
}

/// One parsed `.editorconfig` file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    root: bool,
    sections: Vec<Section>,
}

impl ConfigFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that section patterns are relative to.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// Whether the preamble holds `root = true`.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Sections in file order, starting with the preamble if it has properties.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

/// Read and parse the config file at `path`.
pub fn parse_file(path: &Path, mode: ParseMode) -> Result<ConfigFile, Error> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    parse_str(path, &text, mode)
}

/// Parse config file text; `path` is recorded as the file's identity.
pub fn parse_str(path: &Path, text: &str, mode: ParseMode) -> Result<ConfigFile, Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut root = false;
    let mut preamble = Section::preamble();
    let mut sections: Vec<Section> = Vec::new();
    // False after a malformed header: properties are dropped until the next one
    let mut accepting = true;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            match parse_header(line) {
                Some(pattern) => {
                    sections.push(Section::with_pattern(pattern));
                    accepting = true;
                }
                None => {
                    malformed(path, line_no, mode)?;
                    accepting = false;
                }
            }
            continue;
        }

        let Some((key, value)) = parse_property(line) else {
            malformed(path, line_no, mode)?;
            continue;
        };

        if !accepting {
            continue;
        }

        match sections.last_mut() {
            Some(section) => section.insert(key, value),
            None if key == "root" => root = value == "true",
            None => preamble.insert(key, value),
        }
    }

    if !preamble.properties.is_empty() {
        sections.insert(0, preamble);
    }

    debug!(
        path = %path.display(),
        sections = sections.len(),
        root,
        "parsed config file"
    );

    Ok(ConfigFile {
        path: path.to_path_buf(),
        root,
        sections,
    })
}

fn malformed(path: &Path, line: usize, mode: ParseMode) -> Result<(), Error> {
    match mode {
        ParseMode::Strict => Err(Error::parse(path, line)),
        ParseMode::Lenient => {
            warn!(path = %path.display(), line, "skipping malformed line");
            Ok(())
        }
    }
}

/// Pattern of a `[pattern]` line; the first `]` closes the header.
fn parse_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?;
    let (pattern, rest) = inner.split_once(']')?;
    let rest = rest.trim_start();
    let trailing_ok = rest.is_empty() || rest.starts_with('#') || rest.starts_with(';');

    if !trailing_ok || pattern.is_empty() || pattern.chars().count() > MAX_SECTION_LEN {
        return None;
    }
    Some(pattern)
}

/// Split `key = value` (or `key : value`) at the first delimiter.
fn parse_property(line: &str) -> Option<(String, String)> {
    let split = line.find(|c: char| c == '=' || c == ':')?;
    let key = line[..split].trim().to_lowercase();
    let value = line[split + 1..].trim();

    if key.is_empty()
        || key.chars().count() > MAX_KEY_LEN
        || value.chars().count() > MAX_VALUE_LEN
    {
        return None;
    }

    let value = if CASE_FOLDED_KEYS.contains(&key.as_str()) {
        value.to_lowercase()
    } else {
        value.to_string()
    };
    Some((key, value))
}
