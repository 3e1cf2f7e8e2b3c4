//! The `backoffice` command line.
//!
//! Every command works on a payload already saved from the API (a file, or
//! `-` for stdin). The payload goes through the same adapter and view
//! engine the console screens use.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use backoffice_view::{
    Direction, FacetValue, FieldPath, FilterConfig, SortConfig, SortKey, ValueKind,
};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde_json::Value as Json;
use tracing::debug;

use crate::config::{ConsoleConfig, CONFIG_ENV};
use crate::csv_export::{write_csv, write_export_file};
use crate::error::{ConsoleError, Result};
use crate::output::{render_page, OutputFormat};
use crate::screens::{Screen, ScreenPreset};
use crate::session::ScreenView;

#[derive(Debug, Parser)]
#[command(name = "backoffice")]
#[command(version)]
#[command(about = "Search, filter, sort, page and export back-office list screens")]
pub struct Cli {
    /// YAML config file
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the available screens
    Screens,

    /// Show one page of a screen
    View {
        screen: Screen,

        #[command(flatten)]
        query: QueryArgs,

        /// Page to show, 1-based; clamped to the last page
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,

        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Write every matching row, in view order, to a CSV file
    Export {
        screen: Screen,

        #[command(flatten)]
        query: QueryArgs,

        /// Directory for the export file (default: config `export_dir`)
        #[arg(long, value_name = "DIR", conflicts_with = "stdout")]
        out: Option<PathBuf>,

        /// Write CSV to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// List the values each facet of a screen can take
    Facets {
        screen: Screen,

        /// Saved API payload, `-` for stdin
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
}

/// Input, search, facet and sort options shared by `view` and `export`.
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Saved API payload, `-` for stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Case-insensitive text to look for in the screen's search fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact facet match; `all` lifts the facet
    #[arg(long = "facet", value_name = "PATH=VALUE")]
    pub facets: Vec<String>,

    /// Sort key; repeat for tie-breakers. KIND defaults to the column's
    #[arg(long = "sort", value_name = "PATH[:KIND[:DIR]]")]
    pub sorts: Vec<String>,

    /// Reverse the primary sort key
    #[arg(long)]
    pub desc: bool,
}

/// Parses `PATH=VALUE` into a facet selection.
pub fn parse_facet(raw: &str) -> Result<(FieldPath, FacetValue)> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| ConsoleError::argument("facet", format!("'{raw}' is not PATH=VALUE")))?;
    Ok((FieldPath::parse(path.trim())?, FacetValue::from(value)))
}

/// Parses `PATH[:KIND[:DIR]]`; the kind defaults to the preset column's.
pub fn parse_sort(raw: &str, preset: &ScreenPreset) -> Result<SortKey> {
    let mut parts = raw.split(':');
    let field = FieldPath::parse(parts.next().unwrap_or_default().trim())?;
    let kind = match parts.next() {
        Some(kind) if !kind.is_empty() => kind.parse::<ValueKind>()?,
        _ => preset.kind_of(&field),
    };
    let direction = match parts.next() {
        Some(dir) => dir.parse::<Direction>()?,
        None => Direction::Asc,
    };
    if parts.next().is_some() {
        return Err(ConsoleError::argument(
            "sort",
            format!("'{raw}' is not PATH[:KIND[:DIR]]"),
        ));
    }
    Ok(SortKey::new(field, kind, direction))
}

impl QueryArgs {
    fn filter(&self) -> Result<FilterConfig> {
        let mut filter = FilterConfig::new().query(self.search.clone().unwrap_or_default());
        for raw in &self.facets {
            let (path, value) = parse_facet(raw)?;
            filter = filter.facet(path, value);
        }
        Ok(filter)
    }

    /// Sort keys from `--sort`/`--desc`, or `None` to keep `current`.
    fn sort(&self, preset: &ScreenPreset, current: &SortConfig) -> Result<Option<SortConfig>> {
        let mut keys = self
            .sorts
            .iter()
            .map(|raw| parse_sort(raw, preset))
            .collect::<Result<Vec<_>>>()?;
        if self.desc {
            match keys.first_mut() {
                Some(primary) => primary.direction = primary.direction.flipped(),
                None => {
                    // `--desc` alone reverses the screen's configured sort.
                    let mut sort = current.clone();
                    if let Some(primary) = sort.keys.first_mut() {
                        primary.direction = primary.direction.flipped();
                    }
                    return Ok(Some(sort));
                }
            }
        }
        Ok((!keys.is_empty()).then_some(SortConfig { keys }))
    }

    /// Opens `screen`, loads the payload and applies filter and sort.
    fn open(&self, screen: Screen, config: &ConsoleConfig) -> Result<ScreenView> {
        let mut view = ScreenView::open(screen, config)?;
        let loaded = view.load(read_payload(&self.input)?)?;
        debug!(%screen, records = loaded, "payload loaded");

        view.engine_mut().set_filter(self.filter()?);
        if let Some(sort) = self.sort(view.preset(), view.engine().sort())? {
            view.engine_mut().set_sort(sort);
        }
        Ok(view)
    }
}

/// Reads a JSON payload from `path`, or stdin for `-`.
pub fn read_payload(path: &Path) -> Result<Json> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&text)?)
}

/// Runs one command, writing its output to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };

    match &cli.command {
        Command::Screens => list_screens(out),
        Command::View {
            screen,
            query,
            page,
            page_size,
            output,
        } => {
            let mut view = query.open(*screen, &config)?;
            if let Some(size) = page_size {
                view.set_page_size(config.page_size(*size)?);
            }
            view.engine_mut().set_page(*page);
            out.write_all(render_page(&view, *output)?.as_bytes())?;
            Ok(())
        }
        Command::Export {
            screen,
            query,
            out: dir,
            stdout,
        } => {
            let view = query.open(*screen, &config)?;
            let table = view.export_table();
            if *stdout {
                return write_csv(out, &table);
            }
            let dir = dir.as_deref().unwrap_or(config.export_dir.as_path());
            let path = write_export_file(dir, view.preset().entity(), Local::now().date_naive(), &table)?;
            writeln!(out, "Exported {} rows to {}", table.len(), path.display())?;
            Ok(())
        }
        Command::Facets { screen, input } => {
            let mut view = ScreenView::open(*screen, &config)?;
            view.load(read_payload(input)?)?;
            for (path, options) in view.facet_options() {
                writeln!(out, "{path}: {}", options.join(", "))?;
            }
            Ok(())
        }
    }
}

fn list_screens<W: Write>(out: &mut W) -> Result<()> {
    for screen in Screen::ALL {
        let preset = screen.preset()?;
        let facets: Vec<String> = preset.facets.iter().map(ToString::to_string).collect();
        writeln!(
            out,
            "{:<14} {:<17} facets: {}",
            screen.as_str(),
            screen.title(),
            facets.join(", ")
        )?;
    }
    Ok(())
}
