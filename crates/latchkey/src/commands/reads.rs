//! Card read history handlers.

use tabled::Tabled;

use latchkey_api::models::CardRead;

use crate::cli::{ReadsArgs, ReadsCommand};
use crate::error::CliError;

use super::{Ctx, util};

#[derive(Tabled)]
struct ReadRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Card Number")]
    card_number: String,
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Type")]
    read_type: String,
}

impl From<&CardRead> for ReadRow {
    fn from(r: &CardRead) -> Self {
        Self {
            id: r.id,
            card_number: r.card_number.clone(),
            timestamp: r.timestamp.clone(),
            read_type: r.read_type.clone(),
        }
    }
}

pub async fn handle(ctx: &mut Ctx, args: ReadsArgs) -> Result<(), CliError> {
    match args.command {
        ReadsCommand::List(page) => {
            let reads = ctx.client.list_card_reads(page.page, page.per_page).await?;
            util::print_page(
                ctx,
                &reads,
                page.page,
                page.per_page,
                |r| ReadRow::from(r),
                |r| r.id.to_string(),
            )
        }

        ReadsCommand::Delete { id } => {
            if !util::confirm("reads delete", &format!("Delete card read {id}?"), ctx.yes)? {
                return Ok(());
            }
            let ack = ctx.client.delete_card_read(id).await?;
            ctx.success(ack.message.unwrap_or_else(|| format!("Card read {id} deleted")));
            Ok(())
        }

        ReadsCommand::Clear => {
            if !util::confirm("reads clear", "Delete the entire card read history?", ctx.yes)? {
                return Ok(());
            }
            let cleared = ctx.client.clear_card_reads().await?;
            ctx.success(format!("Removed {} card reads", cleared.data.reads_removed));
            Ok(())
        }
    }
}
