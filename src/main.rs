//! wikisumma CLI - Wikipedia summaries from the command line
//!
//! The lookup logic is contained in lib.rs, and this file is responsible
//! for parsing arguments, prompting, and handling top-level errors.

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use dialoguer::Input;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wikisumma::present::{self, InsertInto, NewSurface, Presenter};
use wikisumma::{lookup_all, surface, Config, HttpTransport, Query, Transport};

#[derive(Parser)]
#[command(name = "wikisumma")]
#[command(author, version, about = "Look up Wikipedia article summaries", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Article titles to look up; prompts for one when omitted.
    /// Put `--` before a title that matches a subcommand: `wikisumma -- completions`
    titles: Vec<String>,
    /// Insert the summary into this existing file instead of a new one
    #[arg(long, value_name = "FILE")]
    insert: Option<PathBuf>,
    /// Byte offset in the --insert file to insert at (default: end)
    #[arg(long, value_name = "OFFSET", requires = "insert")]
    at: Option<usize>,
    /// Wikipedia language code (overrides config and WIKISUMMA_LANG)
    #[arg(short, long)]
    lang: Option<String>,
    /// Path to a config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log lookup progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Commands::Completions { shell }) = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "wikisumma", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(lang) = cli.lang {
        config.language = lang;
    }

    // The destination is fixed now, before anything is fetched
    let presenter: Arc<dyn Presenter> = match &cli.insert {
        Some(target) => {
            if cli.titles.len() > 1 {
                bail!("--insert takes a single title");
            }
            let insert = InsertInto::new(target, cli.at, config.display.fill_column);
            insert.check_writable()?;
            Arc::new(insert)
        }
        None => Arc::new(NewSurface::new(
            &config.display.output_dir,
            config.display.fill_column,
        )),
    };

    let titles = if cli.titles.is_empty() {
        vec![prompt_title(cli.insert.as_deref(), cli.at)?]
    } else {
        cli.titles
    };

    let queries: Vec<Query> = titles
        .into_iter()
        .map(|title| Query::new(title).with_language(config.language.clone()))
        .collect();

    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(&config.http.user_agent, config.timeout())?);

    let mut found = 0;
    let mut stdout = std::io::stdout();
    for (query, result) in lookup_all(queries, transport, presenter).await {
        match result {
            Ok(done) => {
                found += 1;
                present::view(&done.summary, &done.presented, &mut stdout)?;
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => eprintln!("{} {}", format!("{}:", query.title).yellow(), e),
        }
    }

    if found == 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "wikisumma=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Ask for a title, pre-filled with the word at the insertion point
fn prompt_title(target: Option<&Path>, at: Option<usize>) -> anyhow::Result<String> {
    if !atty::is(atty::Stream::Stdin) {
        bail!("no title given");
    }

    let initial = match target {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let offset = at.unwrap_or(content.len());
            surface::word_at(&content, offset)
                .unwrap_or_default()
                .to_string()
        }
        None => String::new(),
    };

    let title: String = Input::new()
        .with_prompt("Wikipedia title")
        .with_initial_text(initial)
        .interact_text()?;

    if title.trim().is_empty() {
        bail!("no title given");
    }
    Ok(title.trim().to_string())
}
