//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use latchkey_api::Page;
use latchkey_core::{FormValidator, PaginationState, PaginationUpdate};
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::Ctx;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))
}

/// Read a secret from the terminal without echo.
pub fn prompt_secret(field: &str) -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::validation(format!("{field} is required")));
    }
    dialoguer::Password::new()
        .with_prompt(field)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))
}

/// Turn recorded form errors into one usage error.
pub fn ensure_valid(form: &FormValidator) -> Result<(), CliError> {
    if form.is_valid() {
        return Ok(());
    }
    let messages: Vec<&str> = form.errors().values().map(String::as_str).collect();
    Err(CliError::validation(messages.join("; ")))
}

/// Pagination position for a page the device returned.
pub fn page_state<T>(page: &Page<T>, requested: u32, per_page: u32) -> PaginationState {
    let mut state = PaginationState::with_per_page(per_page);
    match page.pagination {
        Some(ref p) => state.apply(p),
        None => state.update(PaginationUpdate {
            current_page: Some(requested),
            total_pages: Some(requested.max(1)),
            total_items: u64::try_from(page.items.len()).ok(),
            ..PaginationUpdate::default()
        }),
    }
    state
}

/// Print one page of a list; tables get the page-window footer.
pub fn print_page<T, R>(
    ctx: &Ctx,
    page: &Page<T>,
    requested: u32,
    per_page: u32,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<(), CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    let out = output::render_list(ctx.output, &page.items, to_row, id_fn)?;
    ctx.print(&out);
    if ctx.output == OutputFormat::Table {
        let state = page_state(page, requested, per_page);
        ctx.print(&output::pagination_footer(&state, ctx.painter));
    }
    Ok(())
}

/// Unix seconds as local `YYYY-MM-DD HH:MM`.
pub fn format_unix(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0).map_or_else(
        || ts.to_string(),
        |dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        },
    )
}

pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_owned()
}
