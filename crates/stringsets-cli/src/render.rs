use crate::theme::Theme;
use crossterm::style::{Color, Stylize};
use std::fmt::Display;
use std::io::{self, Write};
use stringsets_core::{SetId, SetStatistics, SolveOutcome, StringSet};

/// Applies theme colors, or passes text through when color is off.
#[derive(Debug, Clone)]
pub struct Painter {
    theme: Theme,
    color: bool,
}

impl Painter {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self { theme, color }
    }

    pub fn plain() -> Self {
        Self::new(Theme::default(), false)
    }

    fn paint(&self, text: impl Display, color: Color) -> String {
        if self.color {
            text.to_string().with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

fn join_values(painter: &Painter, values: &[String]) -> String {
    if values.is_empty() {
        return painter.paint("(none)", painter.theme.info);
    }
    values
        .iter()
        .map(|v| painter.paint(v, painter.theme.value))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_id(out: &mut impl Write, painter: &Painter, id: SetId) -> io::Result<()> {
    writeln!(out, "{}", painter.paint(id, painter.theme.id))
}

pub fn render_ids(out: &mut impl Write, painter: &Painter, ids: &[SetId]) -> io::Result<()> {
    if ids.is_empty() {
        return writeln!(out, "{}", painter.paint("(none)", painter.theme.info));
    }
    let line = ids
        .iter()
        .map(|id| painter.paint(id, painter.theme.id))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "{}", line)
}

pub fn render_strings(out: &mut impl Write, painter: &Painter, values: &[String]) -> io::Result<()> {
    writeln!(out, "{}", join_values(painter, values))
}

pub fn render_set(out: &mut impl Write, painter: &Painter, id: SetId, set: &StringSet) -> io::Result<()> {
    writeln!(
        out,
        "{}: {}",
        painter.paint(id, painter.theme.id),
        join_values(painter, set.as_slice())
    )
}

pub fn render_listing(
    out: &mut impl Write,
    painter: &Painter,
    sets: &[(SetId, StringSet)],
) -> io::Result<()> {
    if sets.is_empty() {
        return writeln!(out, "{}", painter.paint("(no sets)", painter.theme.info));
    }
    for (id, set) in sets {
        render_set(out, painter, *id, set)?;
    }
    Ok(())
}

pub fn render_statistics(
    out: &mut impl Write,
    painter: &Painter,
    id: SetId,
    stats: &SetStatistics,
) -> io::Result<()> {
    let label = |s: &str| painter.paint(s, painter.theme.info);
    writeln!(out, "{} {}", label("set"), painter.paint(id, painter.theme.id))?;
    writeln!(out, "  {}   {}", label("count"), stats.count)?;
    writeln!(out, "  {} {}", label("shortest"), stats.shortest_length)?;
    writeln!(out, "  {}  {}", label("longest"), stats.longest_length)?;
    writeln!(out, "  {}  {:.2}", label("average"), stats.average_length)?;
    writeln!(out, "  {}   {:.2}", label("median"), stats.median_length)
}

/// Prints `abc -> cdf | hij -> jkl` with `|` marking the switch, then a summary.
pub fn render_chain(out: &mut impl Write, painter: &Painter, outcome: &SolveOutcome) -> io::Result<()> {
    let chain = &outcome.chain;
    if chain.is_empty() {
        writeln!(out, "{}", painter.paint("(empty chain)", painter.theme.info))?;
    } else {
        let arrow = painter.paint(" -> ", painter.theme.border);
        let switch = painter.paint(" | ", painter.theme.switch);
        let mut line = String::new();
        for (i, link) in chain.links().iter().enumerate() {
            if i > 0 {
                if Some(i) == chain.switch_index() {
                    line.push_str(&switch);
                } else {
                    line.push_str(&arrow);
                }
            }
            line.push_str(&painter.paint(&link.value, painter.theme.value));
        }
        writeln!(out, "{}", line)?;

        let sets = chain
            .set_ids()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" then ");
        writeln!(
            out,
            "{}",
            painter.paint(
                format!("{} strings from set {}", chain.len(), sets),
                painter.theme.info
            )
        )?;
    }

    if !outcome.complete {
        writeln!(
            out,
            "{}",
            painter.paint(
                format!(
                    "search stopped after {} expansions; chain may not be the longest",
                    outcome.expansions
                ),
                painter.theme.warning
            )
        )?;
    }
    Ok(())
}

pub fn render_error(out: &mut impl Write, painter: &Painter, err: impl Display) -> io::Result<()> {
    writeln!(out, "{} {}", painter.paint("error:", painter.theme.error), err)
}

const COMMANDS: &[(&str, &str)] = &[
    ("upload S...", "store a new set of strings"),
    ("list", "show every stored set"),
    ("get ID", "show one set"),
    ("delete ID", "remove a set"),
    ("search S", "ids of sets containing S"),
    ("most-common", "strings found in the most sets"),
    ("longest", "longest strings across all sets"),
    ("exactly-in N", "strings found in exactly N sets"),
    ("stats ID", "length statistics for a set"),
    ("intersect A B", "store the intersection of two sets"),
    ("chain", "longest chain across the stored sets"),
    ("clear", "remove every set"),
    ("help", "show this list"),
    ("quit", "leave the shell"),
];

pub fn render_help(out: &mut impl Write, painter: &Painter) -> io::Result<()> {
    for (cmd, about) in COMMANDS {
        writeln!(
            out,
            "  {} {}",
            painter.paint(format!("{:<16}", cmd), painter.theme.key),
            painter.paint(about, painter.theme.info)
        )?;
    }
    Ok(())
}
