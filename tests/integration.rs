use std::fs;
use std::path::Path;
use std::process::Command;

use ecfg::{resolve, IndentSize, IndentStyle, ParseMode, ResolveOptions, Resolver};
use tempfile::TempDir;

fn ecfg_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ecfg"));
    cmd.current_dir(cwd).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// A project tree with a root config and a nested override.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".editorconfig"),
        r#"root = true

[*]
global_prop = true
indent_style = space
indent_size = 4
end_of_line = lf

[*.json]
indent_size = 2

[*.{yml,yaml}]
indent_style = tab
yaml_specific_prop = Some Value
"#,
    )
    .unwrap();

    let web = dir.path().join("web");
    fs::create_dir(&web).unwrap();
    fs::write(web.join(".editorconfig"), "[*.js]\nindent_size = 2\nquote_type = single\n").unwrap();
    fs::write(web.join("app.js"), "").unwrap();
    fs::write(dir.path().join("file.json"), "{}").unwrap();
    fs::write(dir.path().join("temp.yml"), "").unwrap();
    dir
}

// ===========================================
// Library: resolution
// ===========================================

#[test]
fn test_json_specific_settings() {
    let dir = project();
    let props = resolve(dir.path().join("file.json")).unwrap();

    assert_eq!(props.indent_style(), Some(IndentStyle::Space));
    assert_eq!(props.indent_size(), Some(IndentSize::Columns(2)));
    assert!(!props.contains_key("yaml_specific_prop"));
    assert_eq!(props.get_bool("global_prop"), Some(true));
    assert_eq!(props.get_bool("global_prop_FAKE"), None);
}

#[test]
fn test_yml_specific_settings() {
    let dir = project();
    let props = resolve(dir.path().join("temp.yml")).unwrap();

    assert_eq!(props.indent_style(), Some(IndentStyle::Tab));
    assert_eq!(props.indent_size(), Some(IndentSize::Columns(4)));
    assert_eq!(props.get("yaml_specific_prop"), Some("Some Value"));
    assert_eq!(props.get_bool("global_prop"), Some(true));
    assert_eq!(props.newline(), Some("\n"));
    assert_eq!(props.convert_tabs_to_spaces(), Some(false));
}

#[test]
fn test_nested_config_overrides_and_reports_contributor() {
    let dir = project();
    let target = dir.path().join("web/app.js");
    let props = resolve(&target).unwrap();

    assert_eq!(props.get("indent_size"), Some("2"));
    assert_eq!(props.get("quote_type"), Some("single"));
    assert_eq!(props.get("end_of_line"), Some("lf"));
    assert_eq!(
        props.config_file(),
        Some(dir.path().join("web/.editorconfig").as_path())
    );
}

#[test]
fn test_empty_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".editorconfig"), "root = true\n").unwrap();

    let props = resolve(dir.path().join("anything.cs")).unwrap();
    assert!(props.is_empty());
    assert_eq!(props.config_file(), None);
    assert_eq!(props.tab_width(), None);
    assert_eq!(props.indent_style(), None);
}

#[test]
fn test_target_need_not_exist() {
    let dir = project();
    let props = resolve(dir.path().join("not/yet/created.json")).unwrap();
    assert_eq!(props.get("indent_size"), Some("2"));
}

#[test]
fn test_tab_width_unset_for_non_numeric() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".editorconfig"),
        "root = true\n[*]\ntab_width = abc\n",
    )
    .unwrap();

    let props = resolve(dir.path().join("a.c")).unwrap();
    assert_eq!(props.tab_width(), None);
    assert_eq!(props.get("tab_width"), Some("abc"));
}

#[test]
fn test_strict_mode_line_number() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join(".editorconfig");
    fs::write(&config, "root = true\n\n[*]\nindent_size = 2\nfoo bar\n").unwrap();

    let lenient = resolve(dir.path().join("a.c")).unwrap();
    assert_eq!(lenient.get("indent_size"), Some("2"));

    let strict = Resolver::new(ResolveOptions {
        mode: ParseMode::Strict,
        ..Default::default()
    });
    let err = strict.resolve(dir.path().join("a.c")).unwrap_err();
    assert_eq!(err.parse_location(), Some((config.as_path(), 5)));
}

// ===========================================
// CLI
// ===========================================

#[test]
fn test_cli_single_file_prints_key_values() {
    let dir = project();
    let output = ecfg_cmd(dir.path())
        .arg(dir.path().join("file.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "global_prop=true\nindent_style=space\nindent_size=2\nend_of_line=lf\n"
    );
}

#[test]
fn test_cli_multiple_files_print_headers() {
    let dir = project();
    let json = dir.path().join("file.json");
    let yml = dir.path().join("temp.yml");
    let output = ecfg_cmd(dir.path()).arg(&json).arg(&yml).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("[{}]", json.display())));
    assert!(stdout.contains(&format!("[{}]", yml.display())));
    assert!(stdout.contains("yaml_specific_prop=Some Value"));
}

#[test]
fn test_cli_directory_argument_walks_files() {
    let dir = project();
    let output = ecfg_cmd(dir.path())
        .arg(dir.path().to_str().unwrap())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("app.js]"));
    assert!(stdout.contains("quote_type=single"));
    // hidden config files are not targets themselves
    assert!(!stdout.contains(".editorconfig]"));
}

#[test]
fn test_cli_strict_flag_fails_on_malformed_line() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".editorconfig"), "root = true\n[*]\nnope\n").unwrap();
    let target = dir.path().join("a.txt");

    let lenient = ecfg_cmd(dir.path()).arg(&target).output().unwrap();
    assert!(lenient.status.success());

    let strict = ecfg_cmd(dir.path())
        .arg("--strict")
        .arg(&target)
        .output()
        .unwrap();
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains(":3: malformed line"));
}

#[test]
fn test_cli_json_output() {
    let dir = project();
    let output = ecfg_cmd(dir.path())
        .arg("--json")
        .arg(dir.path().join("temp.yml"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entry = &value[0];
    assert_eq!(entry["properties"]["indent_style"], "tab");
    assert_eq!(entry["typed"]["indent_style"], "tab");
    assert_eq!(entry["typed"]["tab_width"], serde_json::Value::Null);
}

#[test]
fn test_cli_implied_flag() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".editorconfig"), "root = true\n[*]\nindent_size = 3\n").unwrap();
    let target = dir.path().join("a.txt");

    let output = ecfg_cmd(dir.path())
        .arg("--implied")
        .arg(&target)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "indent_size=3\ntab_width=3\n");
}

#[test]
fn test_cli_custom_file_name() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".ecrc"), "root = true\n[*]\ncharset = utf-8\n").unwrap();

    let output = ecfg_cmd(dir.path())
        .args(["-f", ".ecrc"])
        .arg(dir.path().join("a.txt"))
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "charset=utf-8\n");
}

#[test]
fn test_cli_reads_ecfg_toml() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join("ecfg.toml"), "[resolve]\nstrict = true\n").unwrap();
    fs::write(dir.path().join(".editorconfig"), "root = true\n[*]\nbroken\n").unwrap();

    let output = ecfg_cmd(dir.path())
        .arg(dir.path().join("a.txt"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_cli_init_creates_template() {
    let dir = TempDir::new().unwrap();

    let output = ecfg_cmd(dir.path()).arg("--init").output().unwrap();
    assert!(output.status.success());
    assert!(dir.path().join("ecfg.toml").exists());

    let again = ecfg_cmd(dir.path()).arg("--init").output().unwrap();
    assert!(!again.status.success());
}

#[test]
fn test_cli_requires_paths() {
    let dir = TempDir::new().unwrap();
    let output = ecfg_cmd(dir.path()).output().unwrap();
    assert!(!output.status.success());
}
