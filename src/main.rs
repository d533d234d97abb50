//! Gradebook - course grade bookkeeping
//!
//! CLI entry point.

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gradebook::cli::{parse_grade_spec, ReportCommand, ReportOptions, ReportOutput, ShellCommand};
use gradebook::config::{project_config_path, Config, OutputConfig, MAX_PRECISION};
use gradebook::error::exit_codes;
use gradebook::{Grade, GradeCalculator, MemoryGradeStore};

// =============================================================================
// CLI Definition
// =============================================================================

/// Gradebook - record course grades and compute averages
#[derive(Parser)]
#[command(name = "gradebook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the configured demo grades and print a report
    Demo {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Print a report for the given grades
    Report {
        /// Grade as NAME=VALUE:CREDITS (repeatable)
        #[arg(long = "grade", short = 'g', value_name = "NAME=VALUE:CREDITS")]
        grades: Vec<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Decimal places for averages (0-6)
        #[arg(long, short, value_parser = parse_precision)]
        precision: Option<usize>,
    },

    /// Start an interactive shell
    Shell,

    /// Write the default configuration to .gradebook/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long, short)]
        force: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(exit_codes::USAGE as u8)
            } else {
                // --help and --version
                ExitCode::from(exit_codes::SUCCESS as u8)
            };
        }
    };

    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gradebook error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the `--verbose` flag.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "gradebook=debug"
    } else {
        "gradebook=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Run the selected command and return the exit code.
fn run(command: Commands) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Config::load();
    tracing::debug!(output = ?config.output, "loaded config");

    match command {
        Commands::Demo { json, quiet } => {
            let options = ReportOptions {
                json: json || config.output.json(),
                quiet,
                precision: config.output.precision,
            };
            Ok(run_report(Ok(config.demo.grades.clone()), &options))
        }
        Commands::Report {
            grades,
            json,
            quiet,
            precision,
        } => {
            let options = ReportOptions {
                json: json || config.output.json(),
                quiet,
                precision: precision.unwrap_or(config.output.precision),
            };
            let parsed = grades
                .iter()
                .map(|spec| parse_grade_spec(spec))
                .collect::<gradebook::Result<Vec<Grade>>>();
            Ok(run_report(parsed, &options))
        }
        Commands::Shell => run_shell(&config),
        Commands::Init { force } => run_init(&std::env::current_dir()?, force),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn run_report(grades: gradebook::Result<Vec<Grade>>, options: &ReportOptions) -> ExitCode {
    let output = build_report(grades);

    let formatted = gradebook::cli::report::format_report(&output, options);
    if !formatted.is_empty() {
        print!("{}", formatted);
        if options.json {
            println!();
        }
    }

    success_to_exit_code(output.success)
}

fn build_report(grades: gradebook::Result<Vec<Grade>>) -> ReportOutput {
    match grades {
        Ok(grades) => {
            let calculator = GradeCalculator::new(MemoryGradeStore::new());
            for grade in grades {
                calculator.add_grade(grade);
            }
            ReportCommand::new(calculator).run()
        }
        Err(e) => ReportOutput::failure(e.to_string()),
    }
}

fn run_shell(config: &Config) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let shell = ShellCommand::new(
        GradeCalculator::new(MemoryGradeStore::new()),
        config.output.precision,
    );
    shell.run(io::stdin().lock(), io::stdout().lock())?;
    Ok(ExitCode::from(exit_codes::SUCCESS as u8))
}

/// Write the default config into `cwd`.
fn run_init(cwd: &Path, force: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let path = project_config_path(cwd);

    if path.exists() && !force {
        eprintln!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
        return Ok(ExitCode::from(exit_codes::ERROR as u8));
    }

    let written = Config::default().save_project(cwd)?;
    println!("Wrote {}", written.display());

    Ok(ExitCode::from(exit_codes::SUCCESS as u8))
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

/// Clap value parser for `--precision`.
fn parse_precision(value: &str) -> Result<usize, String> {
    let precision: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of decimal places"))?;
    if OutputConfig::is_valid_precision(precision) {
        Ok(precision)
    } else {
        Err(format!("precision must be between 0 and {MAX_PRECISION}"))
    }
}

// =============================================================================
// Tests
// =============================================================================
