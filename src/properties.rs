//! Effective settings of a file and their typed views

use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// `indent_style`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Tab,
    Space,
}

impl IndentStyle {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "tab" => Some(IndentStyle::Tab),
            "space" => Some(IndentStyle::Space),
            _ => None,
        }
    }
}

/// `indent_size`: a column count, or `tab` to follow `tab_width`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSize {
    Columns(u32),
    Tab,
}

impl IndentSize {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "tab" => Some(IndentSize::Tab),
            _ => parse_positive(value).map(IndentSize::Columns),
        }
    }
}

impl Serialize for IndentSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IndentSize::Columns(n) => serializer.serialize_u32(*n),
            IndentSize::Tab => serializer.serialize_str("tab"),
        }
    }
}

/// `end_of_line`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfLine {
    Lf,
    Cr,
    Crlf,
}

impl EndOfLine {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "lf" => Some(EndOfLine::Lf),
            "cr" => Some(EndOfLine::Cr),
            "crlf" => Some(EndOfLine::Crlf),
            _ => None,
        }
    }

    /// The line terminator itself.
    pub fn as_str(self) -> &'static str {
        match self {
            EndOfLine::Lf => "\n",
            EndOfLine::Cr => "\r",
            EndOfLine::Crlf => "\r\n",
        }
    }
}

/// `charset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Charset {
    #[serde(rename = "latin1")]
    Latin1,
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-8-bom")]
    Utf8Bom,
    #[serde(rename = "utf-16be")]
    Utf16Be,
    #[serde(rename = "utf-16le")]
    Utf16Le,
}

impl Charset {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "latin1" => Some(Charset::Latin1),
            "utf-8" => Some(Charset::Utf8),
            "utf-8-bom" => Some(Charset::Utf8Bom),
            "utf-16be" => Some(Charset::Utf16Be),
            "utf-16le" => Some(Charset::Utf16Le),
            _ => None,
        }
    }
}

/// Well-known properties parsed from the raw values.
///
/// A field is `None` when the property is absent or its value is not
/// understood; no defaults are filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypedProperties {
    pub indent_style: Option<IndentStyle>,
    pub indent_size: Option<IndentSize>,
    pub tab_width: Option<u32>,
    pub end_of_line: Option<EndOfLine>,
    pub charset: Option<Charset>,
    pub trim_trailing_whitespace: Option<bool>,
    pub insert_final_newline: Option<bool>,
}

impl TypedProperties {
    fn from_raw(properties: &[(String, String)]) -> Self {
        let get = |key: &str| {
            properties
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        Self {
            indent_style: get("indent_style").and_then(IndentStyle::parse),
            indent_size: get("indent_size").and_then(IndentSize::parse),
            tab_width: get("tab_width").and_then(parse_positive),
            end_of_line: get("end_of_line").and_then(EndOfLine::parse),
            charset: get("charset").and_then(Charset::parse),
            trim_trailing_whitespace: get("trim_trailing_whitespace").and_then(parse_bool),
            insert_final_newline: get("insert_final_newline").and_then(parse_bool),
        }
    }
}

/// The merged settings applying to one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertySet {
    /// Most specific config file that contributed a property
    config_file: Option<PathBuf>,
    #[serde(serialize_with = "serialize_ordered")]
    properties: Vec<(String, String)>,
    typed: TypedProperties,
}

impl PropertySet {
    pub(crate) fn new(properties: Vec<(String, String)>, config_file: Option<PathBuf>) -> Self {
        let typed = TypedProperties::from_raw(&properties);
        Self {
            config_file,
            properties,
            typed,
        }
    }

    /// Path of the most specific config file that contributed a property.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Raw value of `key` (property names are case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// `key` parsed as an integer; `None` if absent or not numeric.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// `key` parsed as `true`/`false` in any case; `None` otherwise.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| parse_bool(&v.to_ascii_lowercase()))
    }

    /// All properties, in the order they were first set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn typed(&self) -> &TypedProperties {
        &self.typed
    }

    pub fn indent_style(&self) -> Option<IndentStyle> {
        self.typed.indent_style
    }

    pub fn indent_size(&self) -> Option<IndentSize> {
        self.typed.indent_size
    }

    pub fn tab_width(&self) -> Option<u32> {
        self.typed.tab_width
    }

    pub fn end_of_line(&self) -> Option<EndOfLine> {
        self.typed.end_of_line
    }

    pub fn charset(&self) -> Option<Charset> {
        self.typed.charset
    }

    pub fn trim_trailing_whitespace(&self) -> Option<bool> {
        self.typed.trim_trailing_whitespace
    }

    pub fn insert_final_newline(&self) -> Option<bool> {
        self.typed.insert_final_newline
    }

    /// Whether an editor should insert spaces for the tab key.
    pub fn convert_tabs_to_spaces(&self) -> Option<bool> {
        self.typed.indent_style.map(|s| s == IndentStyle::Space)
    }

    /// Line terminator implied by `end_of_line`.
    pub fn newline(&self) -> Option<&'static str> {
        self.typed.end_of_line.map(EndOfLine::as_str)
    }
}

/// Fill in the values EditorConfig implies from related properties.
///
/// - `indent_style = tab` without `indent_size` sets `indent_size = tab`
/// - a numeric `indent_size` without `tab_width` sets `tab_width` to it
/// - `indent_size = tab` with `tab_width` set takes the `tab_width` value
pub(crate) fn apply_implied_values(properties: &mut Vec<(String, String)>) {
    let get = |props: &[(String, String)], key: &str| {
        props
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    let indent_style = get(properties, "indent_style");
    let mut indent_size = get(properties, "indent_size");
    let tab_width = get(properties, "tab_width");

    if indent_style.as_deref() == Some("tab") && indent_size.is_none() {
        upsert(properties, "indent_size", "tab");
        indent_size = Some("tab".to_string());
    }

    match (indent_size.as_deref(), tab_width) {
        (Some("tab"), Some(width)) => upsert(properties, "indent_size", &width),
        (Some(size), None) if size != "tab" => upsert(properties, "tab_width", size),
        _ => {}
    }
}

/// Set `key`, keeping its position if already present.
pub(crate) fn upsert(properties: &mut Vec<(String, String)>, key: &str, value: &str) {
    match properties.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => slot.1 = value.to_string(),
        None => properties.push((key.to_string(), value.to_string())),
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|n| *n > 0)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn serialize_ordered<S: Serializer>(
    properties: &[(String, String)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(properties.len()))?;
    for (k, v) in properties {
        map.serialize_entry(k, v)?;
    }
    map.end()
}
