use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ecfg::{
    find_config_file, generate_init_file, load_config, merge_resolve_options, run,
    should_use_colors, CancelFlag, CliResolveOptions, EcfgToml, OutputContext, OutputMode,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ecfg")]
#[command(version, about = "Print the effective EditorConfig settings of files")]
struct Cli {
    /// Target files or directories
    #[arg(required_unless_present = "init")]
    paths: Vec<String>,

    /// Config file name to look for in each directory
    #[arg(short = 'f', long, value_name = "NAME")]
    file_name: Option<String>,

    /// Never search above this directory
    #[arg(long, value_name = "DIR")]
    stop_at: Option<PathBuf>,

    /// Treat malformed lines in config files as errors
    #[arg(long)]
    strict: bool,

    /// Fill in indent_size/tab_width values implied by related properties
    #[arg(long)]
    implied: bool,

    /// Print results as JSON
    #[arg(long, conflicts_with = "quiet")]
    json: bool,

    /// Print only errors
    #[arg(short, long)]
    quiet: bool,

    /// Log discovery and matching decisions to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Force colored output
    #[arg(long)]
    color: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Generate a template ecfg.toml configuration file
    #[arg(long)]
    init: bool,

    /// Specify config file path (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Handle --init command
    if cli.init {
        return handle_init();
    }

    let toml_config = load_configuration(&cli.config);

    // Merge configurations: CLI > TOML > defaults
    let options = merge_resolve_options(
        &build_cli_options(&cli),
        toml_config.as_ref().map(|c| &c.resolve),
    );
    debug!(?options, "effective options");

    let output_mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    // A bar only makes sense when results go somewhere other than the terminal
    let show_progress =
        output_mode != OutputMode::Quiet && io::stderr().is_terminal() && !io::stdout().is_terminal();
    let ctx = OutputContext::new(
        output_mode,
        should_use_colors(cli.color, cli.no_color) && output_mode != OutputMode::Json,
        show_progress,
    );

    let cancel = CancelFlag::new();
    if let Err(e) = cancel.install_ctrlc() {
        warn!("failed to install Ctrl-C handler: {e}");
    }

    match run(&cli.paths, &options, &ctx, &cancel) {
        Ok(result) => {
            if result.has_errors() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn handle_init() -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn load_configuration(explicit_path: &Option<PathBuf>) -> Option<EcfgToml> {
    let config_path = explicit_path.clone().or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|d| find_config_file(&d))
    });

    config_path.and_then(|p| match load_config(&p) {
        Ok(config) => {
            debug!("using config: {}", p.display());
            Some(config)
        }
        Err(e) => {
            warn!("failed to load {}: {e}", p.display());
            None
        }
    })
}

fn build_cli_options(cli: &Cli) -> CliResolveOptions {
    // Boolean flags in clap are always present (default false), so we
    // treat false as "not set" for proper merging with config file.
    CliResolveOptions {
        strict: cli.strict.then_some(true),
        file_name: cli.file_name.clone(),
        stop_at: cli.stop_at.clone(),
        implied_values: cli.implied.then_some(true),
    }
}
