//! Section listing derived from the route table.

use tabled::Tabled;

use latchkey_core::{NavItem, Route, navigation_menu};

use crate::error::CliError;
use crate::output;

use super::Ctx;

/// Subcommand that opens a route.
fn command_for(route: Route) -> &'static str {
    match route {
        Route::Dashboard => "dashboard",
        Route::Cards => "cards",
        Route::CardReads => "reads",
        Route::Wifi => "wifi",
        Route::Config => "config",
        Route::Logs => "logs",
        Route::RestartSchedules => "schedules",
        Route::FirmwareUpdate => "firmware",
        Route::Login => "login",
        Route::Landing => "",
    }
}

#[derive(Tabled)]
struct MenuRow {
    #[tabled(rename = "")]
    icon: String,
    #[tabled(rename = "Section")]
    title: String,
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Path")]
    path: String,
}

impl From<&NavItem> for MenuRow {
    fn from(item: &NavItem) -> Self {
        Self {
            icon: item.icon.unwrap_or_default().to_owned(),
            title: item.title.to_owned(),
            command: format!("latchkey {}", command_for(item.route)),
            path: item.path.to_owned(),
        }
    }
}

pub fn handle(ctx: &mut Ctx) -> Result<(), CliError> {
    let items = navigation_menu();
    let out = output::render_list(
        ctx.output,
        &items,
        |i| MenuRow::from(i),
        |i| command_for(i.route).to_owned(),
    )?;
    ctx.print(&out);
    if !ctx.client.is_authorized() {
        ctx.info("Every section needs a session. Run `latchkey login <ip>` first.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_menu_entry_has_a_command() {
        for item in navigation_menu() {
            assert!(!command_for(item.route).is_empty(), "{}", item.path);
        }
    }
}
