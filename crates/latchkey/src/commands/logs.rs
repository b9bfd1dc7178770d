//! Device log handlers.

use tabled::Tabled;

use latchkey_api::models::LogEntry;

use crate::cli::{LogsArgs, LogsCommand};
use crate::error::CliError;

use super::{Ctx, util};

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&LogEntry> for LogRow {
    fn from(e: &LogEntry) -> Self {
        Self {
            id: e.id.clone(),
            timestamp: e.timestamp.clone(),
            message: e.message.clone(),
        }
    }
}

pub async fn handle(ctx: &mut Ctx, args: LogsArgs) -> Result<(), CliError> {
    match args.command {
        LogsCommand::List { page, per_page } => {
            let logs = ctx.client.list_logs(page, per_page).await?;
            util::print_page(ctx, &logs, page, per_page, |e| LogRow::from(e), |e| e.id.clone())
        }

        LogsCommand::Delete { id } => {
            if id.trim().is_empty() {
                return Err(CliError::validation("Log ID is required"));
            }
            if !util::confirm("logs delete", &format!("Delete log entry {id}?"), ctx.yes)? {
                return Ok(());
            }
            let ack = ctx.client.delete_log(&id).await?;
            ctx.success(ack.message.unwrap_or_else(|| format!("Log entry {id} deleted")));
            Ok(())
        }

        LogsCommand::Clear => {
            if !util::confirm("logs clear", "Delete all device logs?", ctx.yes)? {
                return Ok(());
            }
            let ack = ctx.client.clear_logs().await?;
            ctx.success(ack.message.unwrap_or_else(|| "Logs cleared".into()));
            Ok(())
        }
    }
}
