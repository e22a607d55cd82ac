use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use livraria::cli::{
    handle_backup_command, handle_book_command, handle_export_command, handle_import_command,
    handle_log_command,
};
use livraria::config::{paths::LivrariaPaths, settings::Settings};
use livraria::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV_VAR: &str = "LIVRARIA_LOG";

#[derive(Parser)]
#[command(
    name = "livraria",
    version,
    about = "Bookstore catalog manager with automatic snapshots",
    long_about = "Livraria keeps a bookstore catalog in a local SQLite database. \
                  Every change to the catalog is followed by a timestamped \
                  snapshot, and only the most recent snapshots are kept."
)]
struct Cli {
    /// Base directory for the catalog, snapshots and exports
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Book management commands
    #[command(subcommand)]
    Book(livraria::cli::BookCommands),

    /// Snapshot management commands
    #[command(subcommand)]
    Backup(livraria::cli::BackupCommands),

    /// Export the catalog to CSV
    Export {
        /// Output file (defaults to exports/livros_exportados.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import books from a CSV file
    Import {
        /// CSV file, relative to the exports directory unless absolute
        file: String,
    },

    /// Show recent catalog changes from the audit log
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Initialize a new catalog
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let paths = match cli.home {
        Some(home) => LivrariaPaths::with_base_dir(home),
        None => LivrariaPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Book(cmd)) => {
            let storage = Storage::open(paths, settings)?;
            handle_book_command(&storage, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            paths.ensure_directories()?;
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Export { output }) => {
            let storage = Storage::open(paths, settings)?;
            handle_export_command(&storage, output)?;
        }
        Some(Commands::Import { file }) => {
            let storage = Storage::open(paths, settings)?;
            handle_import_command(&storage, &file)?;
        }
        Some(Commands::Log { limit }) => {
            handle_log_command(&paths, limit)?;
        }
        Some(Commands::Init) => {
            println!("Initializing Livraria at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            let storage = Storage::open(paths, settings)?;
            println!("Catalog: {}", storage.paths().catalog_file().display());
            println!("Initialization complete!");
            println!();
            println!("Run 'livraria book add <title> <author> <year> <price>' to add a book.");
        }
        Some(Commands::Config) => {
            println!("Livraria Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Catalog file:     {}", paths.catalog_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!();
            println!("Settings:");
            println!("  Snapshots kept:   {}", settings.backup_retention.keep);
            println!("  Backup on import: {}", settings.backup_on_import);
            println!("  Currency symbol:  {}", settings.currency_symbol);
        }
        None => {
            println!("Livraria - Bookstore catalog manager");
            println!();
            println!("Run 'livraria --help' for usage information.");
        }
    }

    Ok(())
}
