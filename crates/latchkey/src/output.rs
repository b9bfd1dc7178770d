//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Status lines are colored from the active theme's palette.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use latchkey_core::{FlashKind, FlashMessage, Palette, PaginationState};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color ────────────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Applies the theme palette, or nothing when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    palette: Palette,
    enabled: bool,
}

impl Painter {
    pub fn new(palette: Palette, enabled: bool) -> Self {
        Self { palette, enabled }
    }

    fn paint(self, text: &str, (r, g, b): (u8, u8, u8)) -> String {
        if self.enabled {
            text.truecolor(r, g, b).to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn accent(self, text: &str) -> String {
        self.paint(text, self.palette.accent)
    }

    pub fn muted(self, text: &str) -> String {
        self.paint(text, self.palette.muted)
    }

    pub fn flash(self, flash: &FlashMessage) -> String {
        let (marker, color) = match flash.kind {
            FlashKind::Success => ("✓", self.palette.success),
            FlashKind::Error => ("✗", self.palette.error),
            FlashKind::Info => ("•", self.palette.info),
        };
        self.paint(&format!("{marker} {}", flash.message), color)
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the items via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// `key: value` lines with the keys aligned.
pub fn detail_lines(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    rows.iter()
        .map(|(k, v)| format!("{:<width$} {v}", format!("{k}:")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Page-window footer under a table, e.g. `Page 5/20  1 ... 3 4 [5] 6 7 ... 20`.
pub fn pagination_footer(state: &PaginationState, painter: Painter) -> String {
    let window = state
        .visible_pages()
        .into_iter()
        .map(|item| match item {
            latchkey_core::PageItem::Page(n) if n == state.current_page => {
                painter.accent(&format!("[{n}]"))
            }
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    let summary = format!(
        "Page {}/{} ({} total)",
        state.current_page,
        state.total_pages.max(1),
        state.total_items
    );
    if window.is_empty() {
        painter.muted(&summary)
    } else {
        format!("{}  {window}", painter.muted(&summary))
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a status line to stderr. Errors are shown even in quiet mode.
pub fn print_flash(flash: &FlashMessage, painter: Painter, quiet: bool) {
    if quiet && flash.kind != FlashKind::Error {
        return;
    }
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", painter.flash(flash));
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
