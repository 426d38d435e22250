//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use schemadoc_core::pipeline::{self, ProgressReporter, RunReport};
use schemadoc_core::registry::Files;
use schemadoc_markdown::{ConverterOptions, MarkdownConverter};
use schemadoc_shared::{
    AppConfig, CONFIG_FILE_NAME, NavTree, SitePaths, init_config, load_config, load_config_from,
};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// schemadoc: publish JSON Schema documents as documentation pages.
#[derive(Parser)]
#[command(
    name = "schemadoc",
    version,
    about = "Publish JSON Schema files and Markdown notes into a documentation site.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Format used to print the generated navigation entry.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum NavFormat {
    Yaml,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Publish the configured schema files into the docs root.
    Build {
        /// Project config file. Relative site paths resolve against its directory.
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,

        /// How to print the generated navigation entry.
        #[arg(long, value_enum, default_value = "yaml")]
        nav_format: NavFormat,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init {
        /// Where to write the config file.
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
    },
    /// Show resolved configuration.
    Show {
        /// Config file to resolve.
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so the printed nav entry can be piped.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "schemadoc=info",
        1 => "schemadoc=debug",
        _ => "schemadoc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { config, nav_format } => cmd_build(&config, nav_format),
        Command::Config { action } => match action {
            ConfigAction::Init { path } => cmd_config_init(&path),
            ConfigAction::Show { config } => cmd_config_show(&config),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(config_path: &Path, nav_format: NavFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let base = config_dir(config_path)?;
    let site = SitePaths::resolve(&config.site, &base);

    if !site.docs_dir.is_dir() {
        return Err(eyre!(
            "docs directory '{}' does not exist",
            site.docs_dir.display()
        ));
    }

    let converter = MarkdownConverter::new(ConverterOptions::from_plugin(&config.plugin)?);

    info!(
        config = %config_path.display(),
        includes = config.plugin.include.len(),
        "publishing schemas"
    );

    let mut files = Files::new();
    let mut nav: Vec<NavTree> = Vec::new();
    let reporter = CliProgress::new()?;

    let result = pipeline::run(
        &config.plugin,
        &site,
        &converter,
        &mut files,
        &mut nav,
        &reporter,
    );
    reporter.spinner.finish_and_clear();
    let report = result?;

    for file in files.iter() {
        debug!(src_uri = %file.src_uri, url = %file.url, "registered site file");
    }
    info!(registered = files.len(), "site files registered");

    let printed = match nav_format {
        NavFormat::Yaml => serde_yaml::to_string(&[&report.nav])?,
        NavFormat::Json => serde_json::to_string_pretty(&[&report.nav])?,
    };
    println!("{}", printed.trim_end());

    print_summary(&report, config.plugin.auto_nav);

    Ok(())
}

fn cmd_config_init(path: &Path) -> Result<()> {
    let path = init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: &Path) -> Result<()> {
    let config: AppConfig = if path.exists() {
        load_config_from(path)?
    } else {
        info!(path = %path.display(), "config file not found, showing defaults");
        AppConfig::default()
    };
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

/// Directory holding the config file, or the working directory for a bare
/// file name.
fn config_dir(config_path: &Path) -> Result<PathBuf> {
    match config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| eyre!("cannot determine working directory: {e}")),
    }
}

fn print_summary(report: &RunReport, auto_nav: bool) {
    eprintln!();
    eprintln!("  Schema pages published!");
    eprintln!("  Pages:    {}", report.published.len());
    eprintln!("  Warnings: {}", report.warnings.len());
    eprintln!("  Failures: {}", report.failures.len());
    if !auto_nav {
        eprintln!("  Nav:      not appended (auto_nav = false)");
    }
    eprintln!("  Time:     {:.1}s", report.elapsed.as_secs_f64());

    for warning in &report.warnings {
        eprintln!("  warning: {warning}");
    }
    for failure in &report.failures {
        eprintln!("  error:   {failure}");
    }
    eprintln!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_done(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Publishing [{current}/{total}] {path}"));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
