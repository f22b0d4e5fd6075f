//! Configuration merging logic
//!
//! Priority: CLI args > ecfg.toml > defaults

use std::path::PathBuf;

use crate::{ParseMode, ResolveOptions};

use super::toml_schema::ResolveSection;

/// CLI options that can override config file settings.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliResolveOptions {
    pub strict: Option<bool>,
    pub file_name: Option<String>,
    pub stop_at: Option<PathBuf>,
    pub implied_values: Option<bool>,
}

/// Merge configurations from CLI, TOML, and defaults.
///
/// Priority: CLI > TOML > defaults
pub fn merge_resolve_options(
    cli: &CliResolveOptions,
    toml: Option<&ResolveSection>,
) -> ResolveOptions {
    let defaults = ResolveOptions::default();

    let strict = cli
        .strict
        .or_else(|| toml.and_then(|t| t.strict))
        .unwrap_or(defaults.mode == ParseMode::Strict);

    ResolveOptions {
        mode: if strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        },
        file_name: cli
            .file_name
            .clone()
            .or_else(|| toml.and_then(|t| t.file_name.clone()))
            .unwrap_or(defaults.file_name),
        stop_at: cli
            .stop_at
            .clone()
            .or_else(|| toml.and_then(|t| t.stop_at.clone()))
            .or(defaults.stop_at),
        implied_values: cli
            .implied_values
            .or_else(|| toml.and_then(|t| t.implied_values))
            .unwrap_or(defaults.implied_values),
        cache: defaults.cache,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_defaults_only() {
        let cli = CliResolveOptions::default();
        let options = merge_resolve_options(&cli, None);

        assert_eq!(options.mode, ParseMode::Lenient);
        assert_eq!(options.file_name, ".editorconfig");
        assert_eq!(options.stop_at, None);
        assert!(!options.implied_values);
    }

    #[test]
    fn test_merge_toml_overrides_defaults() {
        let cli = CliResolveOptions::default();
        let toml = ResolveSection {
            strict: Some(true),
            file_name: Some(".ec".to_string()),
            stop_at: None,
            implied_values: Some(true),
        };

        let options = merge_resolve_options(&cli, Some(&toml));

        assert_eq!(options.mode, ParseMode::Strict);
        assert_eq!(options.file_name, ".ec");
        assert_eq!(options.stop_at, None); // default
        assert!(options.implied_values);
    }

    #[test]
    fn test_merge_cli_overrides_toml() {
        let cli = CliResolveOptions {
            strict: Some(false),
            file_name: None,
            stop_at: Some(PathBuf::from("/work")),
            implied_values: None,
        };
        let toml = ResolveSection {
            strict: Some(true),
            file_name: Some(".ec".to_string()),
            stop_at: Some(PathBuf::from("/elsewhere")),
            implied_values: Some(true),
        };

        let options = merge_resolve_options(&cli, Some(&toml));

        assert_eq!(options.mode, ParseMode::Lenient); // CLI wins
        assert_eq!(options.file_name, ".ec"); // TOML (CLI not set)
        assert_eq!(options.stop_at, Some(PathBuf::from("/work"))); // CLI wins
        assert!(options.implied_values); // TOML
    }
}
