mod app;
mod config;
mod error;
mod input;
mod render;
mod theme;


use app::{App, AppAction};
use clap::{Parser, Subcommand};
use config::{CliConfig, Environment, Overrides};
use crossterm::tty::IsTty;
use error::CliResult;
use render::Painter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use stringsets_core::{InMemoryStore, SetId, SetStore, Solver};
use theme::Theme;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stringsets")]
#[command(about = "Store string sets, query them, and find the longest chain", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/stringsets/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Stop the chain search after this many expansions
    #[arg(long, global = true)]
    max_expansions: Option<u64>,

    /// Allow a string to appear once per set instead of once per chain
    #[arg(long, global = true)]
    allow_repeats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the longest chain across the sets in FILE
    Solve {
        file: PathBuf,
        /// Print the chain as a JSON list
        #[arg(long)]
        json: bool,
    },
    /// Run a single query against the sets in FILE
    Query {
        file: PathBuf,
        #[command(subcommand)]
        query: Query,
    },
    /// Interactive shell over an in-memory store
    Shell {
        /// Seed the store from this file
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum Query {
    /// Show every set
    List,
    /// Strings present in the most sets
    MostCommon,
    /// Longest strings across all sets
    Longest,
    /// Strings present in exactly COUNT sets
    ExactlyIn { count: usize },
    /// Ids of sets containing STRING
    Search { string: String },
    /// Length statistics for a set
    Stats { id: u32 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = Overrides {
        no_color: cli.no_color,
        max_expansions: cli.max_expansions,
        allow_repeats: cli.allow_repeats,
    };
    let config = match CliConfig::load(cli.config.as_deref(), Environment::detect()) {
        Ok(config) => config.apply(&overrides),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    init_logging(&config);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_logging(config: &CliConfig) {
    let filter = EnvFilter::try_from_env("STRINGSETS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands, config: &CliConfig) -> CliResult<()> {
    let painter = if config.color && io::stdout().is_tty() {
        Painter::new(Theme::default(), true)
    } else {
        Painter::plain()
    };
    let solver = Solver::with_config(config.solver.clone());
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Solve { file, json } => {
            let store = input::load_file(&file)?;
            let outcome = store.longest_chain(&solver)?;
            if json {
                writeln!(stdout, "{}", serde_json::to_string(&outcome.chain)?)?;
            } else {
                render::render_chain(&mut stdout, &painter, &outcome)?;
            }
        }
        Commands::Query { file, query } => {
            let store = input::load_file(&file)?;
            run_query(&store, query, &painter, &mut stdout)?;
        }
        Commands::Shell { file } => {
            let store = match file {
                Some(path) => input::load_file(&path)?,
                None => InMemoryStore::new(),
            };
            run_shell(App::new(store, solver, painter), &mut stdout)?;
        }
    }
    Ok(())
}

fn run_query(store: &InMemoryStore, query: Query, painter: &Painter, out: &mut impl Write) -> CliResult<()> {
    match query {
        Query::List => render::render_listing(out, painter, &store.snapshot()?)?,
        Query::MostCommon => render::render_strings(out, painter, &store.most_common()?)?,
        Query::Longest => render::render_strings(out, painter, &store.longest()?)?,
        Query::ExactlyIn { count } => render::render_strings(out, painter, &store.exactly_in(count)?)?,
        Query::Search { string } => render::render_ids(out, painter, &store.search(&string)?)?,
        Query::Stats { id } => {
            let id = SetId(id);
            render::render_statistics(out, painter, id, &store.statistics(id)?)?
        }
    }
    Ok(())
}

fn run_shell(mut app: App, out: &mut impl Write) -> CliResult<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_tty();
    if interactive {
        writeln!(out, "{} sets loaded. Type help for commands.", app.store().len())?;
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        match app.handle_line(&line?, out)? {
            AppAction::Continue => {}
            AppAction::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}
