// One module per device resource, each an `impl DeviceClient` block.
// Every function maps to exactly one verb and path.

mod card_reads;
mod cards;
mod config;
mod dashboard;
mod firmware;
mod logs;
mod schedules;
mod wifi;

/// First page, for every list endpoint.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used by cards, card reads, WiFi, and schedules.
pub const DEFAULT_PER_PAGE: u32 = 10;

pub use crate::models::log::LOGS_PER_PAGE;
