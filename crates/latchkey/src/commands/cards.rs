//! Card command handlers.

use tabled::Tabled;

use latchkey_api::models::{Card, CardDraft, UnregisteredCard};
use latchkey_core::{FormValidator, Format, Rule};

use crate::cli::{CardFields, CardsArgs, CardsCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Personal ID")]
    personal_id: String,
    #[tabled(rename = "Valid From")]
    start: String,
    #[tabled(rename = "Valid Until")]
    end: String,
}

impl From<&Card> for CardRow {
    fn from(c: &Card) -> Self {
        Self {
            id: c.id,
            number: c.number.clone(),
            personal_id: util::or_dash(c.personal_id.as_deref()),
            start: c.start_date.clone(),
            end: util::or_dash(c.end_date.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct UnregisteredRow {
    #[tabled(rename = "Card Number")]
    number: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&UnregisteredCard> for UnregisteredRow {
    fn from(c: &UnregisteredCard) -> Self {
        Self {
            number: c.card_number.clone(),
            last_seen: c.last_seen.clone(),
        }
    }
}

// ── Form ────────────────────────────────────────────────────────────

/// Validate card fields. `creating` makes number and start date required.
fn validate(fields: &CardFields, creating: bool) -> Result<(), CliError> {
    let dates_ordered = match (fields.start_date.as_deref(), fields.end_date.as_deref()) {
        (Some(start), Some(end)) => end >= start,
        _ => true,
    };

    let mut form = FormValidator::new();
    form.validate_opt(
        "Card number",
        fields.number.as_deref(),
        &[Rule::when(creating, Rule::Required), Rule::MaxLength(64)],
    );
    form.validate_opt("Personal ID", fields.personal_id.as_deref(), &[Rule::MaxLength(64)]);
    form.validate_opt(
        "Start date",
        fields.start_date.as_deref(),
        &[Rule::when(creating, Rule::Required), Rule::Format(Format::Date)],
    );
    form.validate_opt(
        "End date",
        fields.end_date.as_deref(),
        &[
            Rule::Format(Format::Date),
            Rule::custom(move |_| dates_ordered)
                .with_message("End date must not be before the start date"),
        ],
    );
    util::ensure_valid(&form)
}

fn draft(fields: CardFields) -> CardDraft {
    CardDraft {
        number: fields.number,
        personal_id: fields.personal_id,
        start_date: fields.start_date,
        end_date: fields.end_date,
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &mut Ctx, args: CardsArgs) -> Result<(), CliError> {
    match args.command {
        CardsCommand::List(page) => {
            let cards = ctx.client.list_cards(page.page, page.per_page).await?;
            util::print_page(
                ctx,
                &cards,
                page.page,
                page.per_page,
                |c| CardRow::from(c),
                |c| c.id.to_string(),
            )
        }

        CardsCommand::Create(mut fields) => {
            if fields.start_date.is_none() {
                fields.start_date = Some(today());
            }
            validate(&fields, true)?;
            let created = ctx.client.create_card(&draft(fields)).await?;
            let message = created
                .message
                .unwrap_or_else(|| format!("Card {} created", created.data.number));
            ctx.success(message);
            Ok(())
        }

        CardsCommand::Update { id, fields } => {
            validate(&fields, false)?;
            let ack = ctx.client.update_card(id, &draft(fields)).await?;
            ctx.success(ack.message.unwrap_or_else(|| format!("Card {id} updated")));
            Ok(())
        }

        CardsCommand::Delete { id } => {
            if !util::confirm("cards delete", &format!("Delete card {id}?"), ctx.yes)? {
                return Ok(());
            }
            let ack = ctx.client.delete_card(id).await?;
            ctx.success(ack.message.unwrap_or_else(|| format!("Card {id} deleted")));
            Ok(())
        }

        CardsCommand::Clear => {
            if !util::confirm("cards clear", "Delete ALL registered cards?", ctx.yes)? {
                return Ok(());
            }
            let ack = ctx.client.clear_cards().await?;
            ctx.success(ack.message.unwrap_or_else(|| "All cards deleted".into()));
            Ok(())
        }

        CardsCommand::Unregistered => {
            let unregistered = ctx.client.list_unregistered_cards().await?;
            let out = output::render_list(
                ctx.output,
                &unregistered.cards,
                |c| UnregisteredRow::from(c),
                |c| c.card_number.clone(),
            )?;
            ctx.print(&out);
            if unregistered.cards.is_empty() {
                ctx.info("No unregistered cards seen");
            }
            Ok(())
        }
    }
}
