//! Interactive shell state and command dispatch.

use crate::error::CliResult;
use crate::render::{self, Painter};
use std::io::Write;
use stringsets_core::{InMemoryStore, SetId, SetStore, Solver, StoreError};

/// Result of handling one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(Vec<String>),
    List,
    Get(SetId),
    Delete(SetId),
    Search(String),
    MostCommon,
    Longest,
    ExactlyIn(usize),
    Stats(SetId),
    Intersect(SetId, SetId),
    Chain,
    Clear,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let id = |i: usize| -> Result<SetId, String> {
            let raw = args.get(i).ok_or_else(|| format!("{} needs a set id", name))?;
            raw.parse().map_err(|_| format!("not a set id: {}", raw))
        };
        let no_args = |cmd: Command| -> Result<Command, String> {
            if args.is_empty() {
                Ok(cmd)
            } else {
                Err(format!("{} takes no arguments", name))
            }
        };

        let cmd = match name {
            "upload" => Command::Upload(args.iter().map(|s| s.to_string()).collect()),
            "list" => no_args(Command::List)?,
            "get" => Command::Get(id(0)?),
            "delete" => Command::Delete(id(0)?),
            "search" => match args.as_slice() {
                [query] => Command::Search(query.to_string()),
                _ => return Err("search needs exactly one string".to_string()),
            },
            "most-common" => no_args(Command::MostCommon)?,
            "longest" => no_args(Command::Longest)?,
            "exactly-in" => {
                let raw = args.first().ok_or("exactly-in needs a count")?;
                Command::ExactlyIn(raw.parse().map_err(|_| format!("not a count: {}", raw))?)
            }
            "stats" => Command::Stats(id(0)?),
            "intersect" => Command::Intersect(id(0)?, id(1)?),
            "chain" => no_args(Command::Chain)?,
            "clear" => no_args(Command::Clear)?,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {} (try help)", other)),
        };
        Ok(Some(cmd))
    }
}

pub struct App {
    store: InMemoryStore,
    solver: Solver,
    painter: Painter,
}

impl App {
    pub fn new(store: InMemoryStore, solver: Solver, painter: Painter) -> Self {
        Self {
            store,
            solver,
            painter,
        }
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// Handle one input line, writing results and errors to `out`.
    ///
    /// Store and parse errors are reported and the shell continues; only a
    /// failed write is returned as an error.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> CliResult<AppAction> {
        let cmd = match Command::parse(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return Ok(AppAction::Continue),
            Err(msg) => {
                render::render_error(out, &self.painter, msg)?;
                return Ok(AppAction::Continue);
            }
        };

        if cmd == Command::Quit {
            return Ok(AppAction::Quit);
        }

        if let Err(err) = self.execute(cmd, out)? {
            render::render_error(out, &self.painter, err)?;
        }
        Ok(AppAction::Continue)
    }

    /// Outer result is output failure, inner is the command's own outcome.
    fn execute(&self, cmd: Command, out: &mut impl Write) -> CliResult<Result<(), StoreError>> {
        let p = &self.painter;
        let store = &self.store;

        macro_rules! attempt {
            ($e:expr) => {
                match $e {
                    Ok(v) => v,
                    Err(err) => return Ok(Err(err)),
                }
            };
        }

        match cmd {
            Command::Upload(strings) => {
                let id = attempt!(store.upload(strings));
                render::render_id(out, p, id)?;
            }
            Command::List => render::render_listing(out, p, &attempt!(store.snapshot()))?,
            Command::Get(id) => render::render_set(out, p, id, &attempt!(store.get(id)))?,
            Command::Delete(id) => render::render_set(out, p, id, &attempt!(store.delete(id)))?,
            Command::Search(query) => render::render_ids(out, p, &attempt!(store.search(&query)))?,
            Command::MostCommon => render::render_strings(out, p, &attempt!(store.most_common()))?,
            Command::Longest => render::render_strings(out, p, &attempt!(store.longest()))?,
            Command::ExactlyIn(n) => render::render_strings(out, p, &attempt!(store.exactly_in(n)))?,
            Command::Stats(id) => {
                render::render_statistics(out, p, id, &attempt!(store.statistics(id)))?
            }
            Command::Intersect(a, b) => {
                let id = attempt!(store.create_intersection(a, b));
                render::render_id(out, p, id)?;
            }
            Command::Chain => {
                let outcome = attempt!(store.longest_chain(&self.solver));
                render::render_chain(out, p, &outcome)?;
            }
            Command::Clear => attempt!(store.clear()),
            Command::Help => render::render_help(out, p)?,
            Command::Quit => {}
        }
        Ok(Ok(()))
    }
}
