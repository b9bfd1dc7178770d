//! Device configuration handlers.

use std::str::FromStr;

use secrecy::SecretString;

use latchkey_api::models::{ConfigPayload, DeviceConfig, DoorLockVariant};
use latchkey_core::{FormValidator, Rule};

use crate::cli::{ConfigArgs, ConfigCommand, ConfigSetArgs};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

/// Seconds the lock may be held open.
const DURATION_RANGE: (f64, f64) = (1.0, 60.0);

fn yes_no(v: bool) -> String {
    if v { "yes" } else { "no" }.into()
}

fn detail(c: &DeviceConfig) -> String {
    output::detail_lines(&[
        ("Auth key", "********".into()),
        ("Lock variant", c.door_lock_variant.to_string()),
        ("Lock duration", format!("{}s", c.door_lock_duration)),
        ("Run without time", yes_no(c.run_program_without_time)),
        ("Active", yes_no(c.active)),
    ])
}

/// Apply the requested changes on top of the current configuration.
fn apply(current: &DeviceConfig, args: ConfigSetArgs) -> Result<ConfigPayload, CliError> {
    let mut form = FormValidator::new();
    form.validate_opt(
        "Door lock variant",
        args.door_lock_variant.as_deref(),
        &[Rule::custom(|v| DoorLockVariant::from_str(v.trim()).is_ok())
            .with_message("Door lock variant must be SOLENOID or MAGNETIC")],
    );
    form.validate_opt(
        "Door lock duration",
        args.door_lock_duration.as_deref(),
        &[
            Rule::custom(|v| v.trim().parse::<u32>().is_ok())
                .with_message("Door lock duration must be a whole number of seconds"),
            Rule::Range {
                min: DURATION_RANGE.0,
                max: DURATION_RANGE.1,
            },
        ],
    );
    form.validate_opt(
        "New auth key",
        args.new_auth_key.as_deref(),
        &[Rule::Required, Rule::MinLength(4), Rule::MaxLength(64)],
    );
    util::ensure_valid(&form)?;

    let mut payload = ConfigPayload::from_current(current);
    if let Some(variant) = args.door_lock_variant {
        payload.door_lock_variant = DoorLockVariant::from_str(variant.trim())
            .map_err(|e| CliError::validation(e.to_string()))?;
    }
    if let Some(duration) = args.door_lock_duration {
        payload.door_lock_duration = duration
            .trim()
            .parse()
            .map_err(|_| CliError::validation("Door lock duration must be a number"))?;
    }
    if let Some(v) = args.run_program_without_time {
        payload.run_program_without_time = v;
    }
    if let Some(v) = args.active {
        payload.active = v;
    }
    if let Some(key) = args.new_auth_key {
        payload.auth_key = SecretString::from(key);
    }
    Ok(payload)
}

pub async fn handle(ctx: &mut Ctx, args: ConfigArgs) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Get => {
            let config = ctx.client.get_config().await?;
            let out = output::render_single(ctx.output, &config, detail, |c| {
                c.door_lock_variant.to_string()
            })?;
            ctx.print(&out);
            Ok(())
        }

        ConfigCommand::Set(set) => {
            let current = ctx.client.get_config().await?;
            let payload = apply(&current, set)?;
            let rotating = payload.changes_auth_key();
            if rotating
                && !util::confirm(
                    "config set",
                    "Replace the device auth key? Other clients will be logged out.",
                    ctx.yes,
                )?
            {
                return Ok(());
            }

            let ack = ctx.client.update_config(payload).await?;
            ctx.success(
                ack.message
                    .unwrap_or_else(|| "Configuration updated".into()),
            );
            if rotating {
                ctx.info("Session now uses the new auth key");
            }
            Ok(())
        }
    }
}
