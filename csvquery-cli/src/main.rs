mod commands;
mod format;
mod shell;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use csvquery_core::{load_file, LoaderConfig, Searcher};
use tracing_subscriber::EnvFilter;

use crate::commands::{run_query, run_view, CmdResult, QueryArgs, ViewArgs};

#[derive(Parser)]
#[command(name = "csvquery")]
#[command(about = "Load, view, and search CSV tables by exact value")]
#[command(version)]
struct Cli {
    /// Only allow loading files under this directory
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Accept files without a .csv extension
    #[arg(long, global = true)]
    allow_any_extension: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show table metadata: rows, columns, header, size
    Info {
        /// Path to the CSV file
        file: PathBuf,

        /// Treat the first row as a header
        #[arg(long)]
        header: bool,
    },

    /// View rows from a CSV file
    View {
        /// Path to the CSV file
        file: PathBuf,

        #[command(flatten)]
        args: ViewArgs,
    },

    /// Search for rows whose value in a column matches exactly
    Search {
        /// Path to the CSV file
        file: PathBuf,

        #[command(flatten)]
        args: QueryArgs,
    },

    /// Interactive session: load, view, search, and unload tables
    Shell,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = LoaderConfig {
        data_dir: cli.data_dir,
        require_csv_extension: !cli.allow_any_extension,
    };

    let result = match cli.command {
        Commands::Info { file, header } => cmd_info(&file, header, &config),
        Commands::View { file, args } => cmd_view(&file, &args, &config),
        Commands::Search { file, args } => cmd_search(&file, &args, &config),
        Commands::Shell => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            shell::run(stdin.lock(), &mut io::stdout().lock(), &config, prompt)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn cmd_info(path: &Path, header: bool, config: &LoaderConfig) -> CmdResult {
    let start = Instant::now();
    let loaded = load_file(path, config)?;
    let elapsed = start.elapsed();

    let metadata = std::fs::metadata(path)?;
    let table = loaded.table();
    let searcher = Searcher::new(table, header)?;

    println!("File:       {}", path.display());
    println!("Size:       {}", format::format_size(metadata.len()));
    println!("Rows:       {}", format::format_number(searcher.rows().len()));
    println!("Columns:    {}", table.width().unwrap_or(0));
    if header {
        println!("Header:     {}", searcher.header().join(", "));
    }
    println!("Load time:  {:.2?}", elapsed);

    Ok(())
}

fn cmd_view(path: &Path, args: &ViewArgs, config: &LoaderConfig) -> CmdResult {
    let loaded = load_file(path, config)?;
    run_view(&mut io::stdout().lock(), loaded.table(), args)
}

fn cmd_search(path: &Path, args: &QueryArgs, config: &LoaderConfig) -> CmdResult {
    let loaded = load_file(path, config)?;
    run_query(&mut io::stdout().lock(), loaded.table(), args)
}
