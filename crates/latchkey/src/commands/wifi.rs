//! WiFi network handlers.

use tabled::Tabled;

use latchkey_api::models::wifi::masked_password;
use latchkey_api::models::{WifiCredentials, WifiNetwork};
use latchkey_core::{FormValidator, Rule};

use crate::cli::{OutputFormat, WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

#[derive(Tabled)]
struct WifiRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Password")]
    password: String,
}

impl From<&WifiNetwork> for WifiRow {
    fn from(w: &WifiNetwork) -> Self {
        Self {
            id: w.id,
            ssid: w.ssid.clone(),
            password: match masked_password(&w.password) {
                "" => "(open)".into(),
                masked => masked.into(),
            },
        }
    }
}

fn credentials(ssid: String, password: Option<String>) -> Result<WifiCredentials, CliError> {
    let password = match password {
        Some(p) => p,
        None => util::prompt_secret("Password")?,
    };

    let mut form = FormValidator::new();
    form.validate_field("SSID", &ssid, &[Rule::Required, Rule::MaxLength(32)]);
    form.validate_field(
        "Password",
        &password,
        &[Rule::MinLength(8), Rule::MaxLength(63)],
    );
    util::ensure_valid(&form)?;

    Ok(WifiCredentials { ssid, password })
}

pub async fn handle(ctx: &mut Ctx, args: WifiArgs) -> Result<(), CliError> {
    match args.command {
        WifiCommand::List(page) => {
            let list = ctx
                .client
                .list_wifi_networks(page.page, page.per_page)
                .await?;
            if ctx.output != OutputFormat::Table {
                let out = output::render_single(ctx.output, &list, |_| String::new(), |l| {
                    l.page
                        .items
                        .iter()
                        .map(|w| w.id.to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                })?;
                ctx.print(&out);
                return Ok(());
            }

            util::print_page(
                ctx,
                &list.page,
                page.page,
                page.per_page,
                |w| WifiRow::from(w),
                |w| w.id.to_string(),
            )?;
            if let Some(conn) = list.current_connection {
                ctx.info(format!(
                    "Connected to {} as {} ({})",
                    conn.ssid, conn.ip, conn.mac
                ));
            }
            Ok(())
        }

        WifiCommand::Add { ssid, password } => {
            let creds = credentials(ssid, password)?;
            let ack = ctx.client.create_wifi_network(&creds).await?;
            ctx.success(
                ack.message
                    .unwrap_or_else(|| format!("Network {} added", creds.ssid)),
            );
            Ok(())
        }

        WifiCommand::Update { id, ssid, password } => {
            let creds = credentials(ssid, password)?;
            let ack = ctx.client.update_wifi_network(id, &creds).await?;
            ctx.success(ack.message.unwrap_or_else(|| format!("Network {id} updated")));
            Ok(())
        }

        WifiCommand::Delete { id } => {
            if !util::confirm("wifi delete", &format!("Delete WiFi network {id}?"), ctx.yes)? {
                return Ok(());
            }
            let deleted = ctx.client.delete_wifi_network(id).await?;
            ctx.success(
                deleted
                    .message
                    .unwrap_or_else(|| format!("Network {id} deleted")),
            );
            Ok(())
        }

        WifiCommand::Clear => {
            if !util::confirm("wifi clear", "Delete all stored WiFi networks?", ctx.yes)? {
                return Ok(());
            }
            let cleared = ctx.client.clear_wifi_networks().await?;
            let mut message = format!("Removed {} networks", cleared.data.cleared_count);
            if cleared.data.default_credentials_preserved {
                message.push_str(" (default credentials kept)");
            }
            ctx.success(message);
            Ok(())
        }
    }
}
