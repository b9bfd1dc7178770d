//! Device health overview.

use latchkey_api::models::DashboardStats;

use crate::error::CliError;
use crate::output;

use super::Ctx;

fn detail(s: &DashboardStats) -> String {
    let time = if s.time.is_valid {
        format!("{} ({}, {})", s.time.datetime, s.time.timezone, s.time.time_source)
    } else {
        "not set".into()
    };
    output::detail_lines(&[
        ("Status", s.status.clone()),
        ("API version", s.api_version.clone()),
        ("WiFi", format!("{} ({}%, {} dBm)", s.wifi.ssid, s.wifi.strength, s.wifi.rssi)),
        ("Address", format!("{} / {}", s.wifi.ip, s.wifi.mac)),
        ("CPU", format!("{} MHz", s.system.cpu_freq)),
        ("Uptime", s.system.uptime.clone()),
        (
            "Heap",
            format!(
                "{} free of {} ({:.1}% used, low {})",
                s.heap.free, s.heap.total, s.heap.usage_percent, s.heap.minimum
            ),
        ),
        (
            "Flash",
            format!("{} @ {}", s.storage.flash.size, s.storage.flash.speed),
        ),
        (
            "Filesystem",
            format!(
                "{} used of {} ({:.1}%)",
                s.storage.filesystem.used,
                s.storage.filesystem.total,
                s.storage.filesystem.usage_percent
            ),
        ),
        (
            "Cards",
            format!(
                "{} total, {} active, {} inactive ({:.0}% active)",
                s.database.cards.total,
                s.database.cards.active,
                s.database.cards.inactive,
                s.database.cards.active_percent
            ),
        ),
        (
            "Reads",
            format!("{} today, {} total", s.database.reads.today, s.database.reads.total),
        ),
        ("Clock", time),
    ])
}

pub async fn handle(ctx: &mut Ctx) -> Result<(), CliError> {
    let stats = ctx.client.dashboard_stats().await?;
    let out = output::render_single(ctx.output, &stats, detail, |s| s.status.clone())?;
    ctx.print(&out);
    if !stats.time.is_valid {
        ctx.info("The device clock is not set");
    }
    Ok(())
}
