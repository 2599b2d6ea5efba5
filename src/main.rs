//! testrail-reporter CLI - report JUnit XML results to TestRail.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use testrail_reporter::config;
use testrail_reporter::framework::junit::read_junit_file;
use testrail_reporter::report::{print_failure, print_summary};
use testrail_reporter::{ReporterError, ReporterSession};

#[derive(Parser)]
#[command(name = "testrail-reporter")]
#[command(about = "Report automated test results to TestRail", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "testrail.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the results in JUnit XML files
    Report {
        /// JUnit XML files, replayed in order
        #[arg(required = true)]
        junit: Vec<PathBuf>,

        /// Report into this existing run instead of the configured one
        #[arg(long)]
        run_id: Option<u64>,
    },

    /// Validate configuration file
    Validate,

    /// Initialize a new configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Report { junit, run_id } => report(&cli.config, &junit, run_id).await,
        Commands::Validate => validate_config(&cli.config),
        Commands::Init => init_config(&cli.config),
    }
}

async fn report(config_path: &Path, junit_paths: &[PathBuf], run_id: Option<u64>) -> Result<()> {
    let mut config = config::load_config(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(run_id) = run_id {
        config.testrail.run_id = Some(run_id);
    }

    let mut session = ReporterSession::new(&config)?;
    for diagnostic in session.diagnostics() {
        warn!("{}", diagnostic);
    }
    session.on_session_start();

    let mut total = 0;
    let mut identified = 0;
    for path in junit_paths {
        let tests = read_junit_file(path)?;
        total += tests.len();
        for test in &tests {
            if session.on_test_finished(test).is_some() {
                identified += 1;
            }
        }
    }
    info!(
        "Read {} test cases, {} with a TestRail case id ({} distinct)",
        total,
        identified,
        session.results().len()
    );

    match session.on_session_finished().await {
        Ok(report) => {
            print_summary(&report);
            Ok(())
        }
        Err(ReporterError::Reporting(failure)) => {
            print_failure(&failure);
            Err(ReporterError::Reporting(failure).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn validate_config(config_path: &Path) -> Result<()> {
    let validated = config::load_config(config_path).and_then(|config| config.validate());

    match validated {
        Ok(validated) => {
            let settings = &validated.settings;
            println!("Configuration is valid!");
            println!();
            println!("Settings:");
            println!("  Host: {}", settings.host);
            println!("  Username: {}", settings.username);
            println!("  Project: {}", settings.project_id);
            if let Some(suite_id) = settings.suite_id {
                println!("  Suite: {}", suite_id);
            }
            match settings.run_id {
                Some(run_id) => println!("  Run: {} (existing)", run_id),
                None => println!("  Run: new run per session"),
            }
            if let Some(milestone_id) = settings.milestone_id {
                println!("  Milestone: {}", milestone_id);
            }
            if let Some(version) = &settings.version {
                println!("  Version: {}", version);
            }

            if !validated.diagnostics.is_empty() {
                println!();
                for diagnostic in &validated.diagnostics {
                    println!("{} {}", console::style("warning:").yellow(), diagnostic);
                }
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_config(path: &Path) -> Result<()> {
    let config = r#"# testrail-reporter configuration file

[testrail]
host = "https://example.testrail.io"
username = "ci@example.com"
# Environment variables are expanded, keep secrets out of the file
api_key = "${TESTRAIL_API_KEY}"
project_id = 1
# suite_id = 1

# Report into an existing run...
# run_id = 123
# ...or attach newly created runs to a milestone
# milestone_id = 456

[report]
# Version tag attached to every result; the first non-empty variable wins
version_env = ["TEST_VERSION", "CI_COMMIT_SHA"]
"#;

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit manually.",
            path.display()
        );
        std::process::exit(1);
    }

    std::fs::write(path, config)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    println!();
    println!("Edit the configuration as needed, then run:");
    println!("  testrail-reporter report junit.xml");

    Ok(())
}
