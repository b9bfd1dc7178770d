//! Login, logout, and session status.

use std::io::{self, IsTerminal};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use latchkey_core::{FormValidator, Format, Rule, Theme};

use crate::cli::{LoginArgs, LogoutArgs};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

const DEFAULT_PORT: u16 = 80;

pub async fn login(ctx: &mut Ctx, args: LoginArgs) -> Result<(), CliError> {
    // The last connection survives logout and pre-fills this one.
    let previous = ctx.client.session().connection();
    let device = ctx.device.clone();

    let ip = args
        .ip
        .or_else(|| previous.as_ref().map(|c| c.ip.clone()))
        .or_else(|| device.as_ref().map(|d| d.ip.clone()))
        .ok_or_else(|| CliError::NoDevice {
            path: latchkey_config::config_path().display().to_string(),
        })?;
    let same_device = previous.filter(|c| c.ip == ip);
    let port = args
        .port
        .or_else(|| same_device.as_ref().map(|c| c.port))
        .or_else(|| device.filter(|d| d.ip == ip).map(|d| d.port))
        .unwrap_or(DEFAULT_PORT);

    let mut form = FormValidator::new();
    form.validate_field(
        "IP address",
        &ip,
        &[Rule::Required, Rule::Format(Format::Ipv4)],
    );
    form.validate_field("Port", &port.to_string(), &[Rule::Format(Format::Port)]);
    util::ensure_valid(&form)?;

    let key = latchkey_config::resolve_auth_key(
        args.auth_key.map(SecretString::from),
        same_device.map(|c| c.auth_key),
        &ip,
        io::stdin().is_terminal(),
    )?;
    form.validate_field("Auth key", key.expose_secret(), &[Rule::Required]);
    util::ensure_valid(&form)?;

    ctx.client.login(&ip, port, key.clone()).await?;
    if args.remember {
        latchkey_config::store_auth_key(&ip, &key)?;
    }
    ctx.success(format!("Logged in to {ip}:{port}"));
    Ok(())
}

pub fn logout(ctx: &mut Ctx, args: &LogoutArgs) -> Result<(), CliError> {
    let was_authorized = ctx.client.is_authorized();
    ctx.client.logout()?;

    if args.forget {
        if let Some(conn) = ctx.client.session().connection() {
            latchkey_config::forget_auth_key(&conn.ip)?;
        }
    }

    if was_authorized {
        ctx.success("Logged out");
    } else {
        ctx.info("Not logged in");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusView {
    authorized: bool,
    ip: Option<String>,
    port: Option<u16>,
    base_url: String,
    theme: Theme,
}

pub fn status(ctx: &Ctx) -> Result<(), CliError> {
    let session = ctx.client.session();
    let conn = session.connection();
    let view = StatusView {
        authorized: session.is_authorized(),
        ip: conn.as_ref().map(|c| c.ip.clone()),
        port: conn.as_ref().map(|c| c.port),
        base_url: session.base_url()?.to_string(),
        theme: ctx.theme.theme(),
    };

    let out = output::render_single(
        ctx.output,
        &view,
        |v| {
            output::detail_lines(&[
                ("Logged in", if v.authorized { "yes" } else { "no" }.into()),
                ("Device", util::or_dash(v.ip.as_deref())),
                ("Port", v.port.map_or_else(|| "-".into(), |p| p.to_string())),
                ("API", v.base_url.clone()),
                ("Theme", v.theme.to_string()),
            ])
        },
        |v| v.authorized.to_string(),
    )?;
    ctx.print(&out);
    Ok(())
}
