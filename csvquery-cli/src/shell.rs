use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use csvquery_core::{load_file, LoaderConfig, TableHolder};
use tracing::debug;

use crate::commands::{run_query, run_view, CmdResult, QueryArgs, ViewArgs};

#[derive(Parser)]
#[command(name = "", no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Load a CSV file, replacing the current table
    Load {
        /// Path to the CSV file
        path: PathBuf,
    },
    /// Discard the current table
    Unload,
    /// Show rows of the current table
    View(ViewArgs),
    /// Search the current table
    Search(QueryArgs),
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Read commands line by line from `input` until EOF or `quit`.
///
/// Command errors are reported on `out` and do not end the session.
pub fn run<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    config: &LoaderConfig,
    prompt: bool,
) -> CmdResult {
    let holder = TableHolder::new();

    if prompt {
        write!(out, "> ")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();

        if !words.is_empty() {
            match ShellLine::try_parse_from(words.iter().copied()) {
                Ok(ShellLine {
                    command: ShellCommand::Quit,
                }) => break,
                Ok(parsed) => {
                    if let Err(e) = execute(&holder, config, parsed.command, out) {
                        writeln!(out, "Error: {e}")?;
                    }
                }
                Err(e) => writeln!(out, "{}", e.to_string().trim_end())?,
            }
        }

        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
    }

    Ok(())
}

fn execute<W: Write>(
    holder: &TableHolder,
    config: &LoaderConfig,
    command: ShellCommand,
    out: &mut W,
) -> CmdResult {
    debug!(?command, "shell command");
    match command {
        ShellCommand::Load { path } => {
            let loaded = load_file(&path, config)?;
            let rows = loaded.table().len();
            let width = loaded.table().width().unwrap_or(0);
            holder.load(loaded);
            writeln!(
                out,
                "Loaded {} ({} rows, {} columns)",
                path.display(),
                rows,
                width
            )?;
        }
        ShellCommand::Unload => match holder.clear() {
            Some(previous) => writeln!(out, "Unloaded {}", previous.source().display())?,
            None => writeln!(out, "No table loaded")?,
        },
        ShellCommand::View(args) => {
            let snapshot = holder.require()?;
            run_view(out, snapshot.table(), &args)?;
        }
        ShellCommand::Search(args) => {
            let snapshot = holder.require()?;
            run_query(out, snapshot.table(), &args)?;
        }
        ShellCommand::Quit => {}
    }
    Ok(())
}
