//! Mushaf CLI
//!
//! Command-line reader for the Quran corpus: browse surahs, read ayahs with
//! their translations, and keep a single "continue reading" bookmark.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mushaf_core::{Config, StorageError, Store, StoreError};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(name = "mushaf")]
#[command(about = "Mushaf - Quran reader with a continue-reading bookmark")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the corpus from a JSON bundle
    Import {
        /// Bundle file with chapters, verses and volumes
        file: PathBuf,
    },
    /// List all surahs
    #[command(alias = "ls")]
    Surahs,
    /// Show one surah's details
    Surah {
        /// Surah number (1-114)
        number: u32,
    },
    /// Read a surah's ayahs with translations
    Read {
        /// Surah number (1-114)
        surah: u32,
    },
    /// Show where each juz begins
    Juz,
    /// Show or set the reading bookmark
    Bookmark {
        #[command(subcommand)]
        command: Option<BookmarkCommands>,
    },
    /// Verify the stored corpus is complete and consistent
    Check,
    /// Show corpus counts, bookmark and storage location
    Status,
    /// Delete the corpus and bookmark
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// Show the current bookmark
    Show,
    /// Save the bookmark at a surah and ayah
    Set {
        /// Surah number
        surah: u32,
        /// Ayah number within the surah
        ayah: u32,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_level, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match run(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(hint) = recovery_suggestion(&e) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Config commands work without opening the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let store = open_store(config)?;

    match cli.command {
        Commands::Import { file } => commands::corpus::import(&store, &file, output),
        Commands::Surahs => commands::corpus::surahs(&store, output),
        Commands::Surah { number } => commands::corpus::surah(&store, number, output),
        Commands::Read { surah } => commands::corpus::read(&store, surah, output),
        Commands::Juz => commands::corpus::juz(&store, output),
        Commands::Bookmark { command } => handle_bookmark_command(command, &store, output),
        Commands::Check => commands::corpus::check(&store, output),
        Commands::Status => commands::status::show(&store, output),
        Commands::Reset { yes } => commands::corpus::reset(&store, yes, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn open_store(config: Config) -> Result<Store> {
    Store::open_with_config(config).context("Failed to open the corpus store")
}

/// Recovery advice from the first storage error in the chain
fn recovery_suggestion(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(storage) = cause.downcast_ref::<StorageError>() {
            return storage.recovery_suggestion();
        }
        // Transparent: the wrapped StorageError is not its own link in the chain
        match cause.downcast_ref::<StoreError>() {
            Some(StoreError::Storage(storage)) => storage.recovery_suggestion(),
            _ => None,
        }
    })
}

fn handle_bookmark_command(
    command: Option<BookmarkCommands>,
    store: &Store,
    output: &Output,
) -> Result<()> {
    match command {
        Some(BookmarkCommands::Show) | None => commands::bookmark::show(store, output),
        Some(BookmarkCommands::Set { surah, ayah }) => {
            commands::bookmark::set(store, surah, ayah, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize tracing from the configured level, to a file or stderr
fn init_logging(config: &Config) {
    let directive = config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    let env_filter = EnvFilter::try_new(directive).unwrap_or_else(|_| {
        eprintln!(
            "Warning: invalid log level {:?}, using {:?}",
            directive, DEFAULT_LOG_LEVEL
        );
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    // Ignore the error if a subscriber is already installed
    match &config.log_file {
        Some(log_path) => match File::create(log_path) {
            Ok(log_file) => {
                let _ = builder.with_ansi(false).with_writer(log_file).try_init();
                info!("Logging to {:?}", log_path);
            }
            Err(e) => {
                eprintln!("Warning: could not create log file {:?}: {}", log_path, e);
                let _ = builder.with_writer(std::io::stderr).try_init();
            }
        },
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
