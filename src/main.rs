use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wharf::routines::lock::LockOptions;
use wharf::routines::purge::PurgeOptions;
use wharf::routines::uninstall::UninstallOptions;
use wharf::WharfError;

mod cli;

#[derive(Parser)]
#[command(name = "wharf")]
#[command(about = "Manifest and lockfile management for Python virtualenvs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove packages from the manifest, lockfile and environment
    Uninstall {
        /// Package specs to remove
        packages: Vec<String>,
        /// Editable specs to remove (paths or names)
        #[arg(short = 'e', long = "editable")]
        editable: Vec<String>,
        /// Categories to operate on (manifest or lockfile naming)
        #[arg(short = 'c', long = "category")]
        categories: Vec<String>,
        /// Remove everything declared in the dev category
        #[arg(long)]
        all_dev: bool,
        /// Remove everything declared in every category, then purge
        #[arg(long)]
        all: bool,
        /// Target the global interpreter instead of the virtualenv
        #[arg(long)]
        system: bool,
        /// Run a full fresh lock after uninstalling
        #[arg(long)]
        lock: bool,
        /// Allow pre-releases when re-resolving
        #[arg(long)]
        pre: bool,
        /// Alternative package index mirror
        #[arg(long)]
        pypi_mirror: Option<String>,
    },
    /// Remove every non-protected package from the environment
    Purge {
        /// Suppress progress output
        #[arg(long)]
        bare: bool,
        /// Delete the downloads cache instead of touching the environment
        #[arg(long)]
        downloads: bool,
        /// Target the global interpreter instead of the virtualenv
        #[arg(long)]
        system: bool,
    },
    /// Regenerate the lockfile from the manifest
    Lock {
        /// Resolve against the global interpreter
        #[arg(long)]
        system: bool,
        /// Allow pre-release versions
        #[arg(long)]
        pre: bool,
        /// Alternative package index mirror
        #[arg(long)]
        pypi_mirror: Option<String>,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Uninstall {
            packages,
            editable,
            categories,
            all_dev,
            all,
            system,
            lock,
            pre,
            pypi_mirror,
        } => cli::uninstall::run(UninstallOptions {
            packages,
            editable_packages: editable,
            categories,
            all_dev,
            all,
            system,
            lock,
            pre,
            pypi_mirror,
        }),
        Commands::Purge {
            bare,
            downloads,
            system,
        } => cli::purge::run(PurgeOptions {
            bare,
            downloads,
            allow_global: system,
        }),
        Commands::Lock {
            system,
            pre,
            pypi_mirror,
        } => cli::lock::run(LockOptions {
            system,
            pre,
            pypi_mirror,
        }),
    };

    // Handle result and exit codes
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match &e {
            WharfError::SubprocessExit(code) => {
                // Environment removal failed - exit with its code.
                // The failure summary was already printed.
                ExitCode::from(*code as u8)
            }
            _ => {
                eprintln!("\n{}", wharf::format_error_with_help(&e));
                ExitCode::FAILURE
            }
        },
    }
}
