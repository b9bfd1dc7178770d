use serde::{Deserialize, Serialize};

/// `POST /stats` body. Unlike other endpoints the telemetry is not wrapped
/// in `data`; the `status` field sits beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub api_version: String,
    pub status: String,
    pub wifi: WifiInfo,
    pub system: SystemInfo,
    pub heap: HeapInfo,
    pub storage: StorageInfo,
    pub database: DatabaseInfo,
    pub time: TimeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiInfo {
    pub rssi: i32,
    /// Signal strength, percent.
    pub strength: u8,
    pub ssid: String,
    pub ip: String,
    pub mac: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// MHz.
    pub cpu_freq: u32,
    pub uptime: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapInfo {
    pub free: String,
    pub total: String,
    pub minimum: String,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageInfo {
    pub flash: FlashInfo,
    pub filesystem: FilesystemInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashInfo {
    pub size: String,
    pub speed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesystemInfo {
    pub total: String,
    pub used: String,
    pub free: String,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub cards: CardStats,
    pub reads: ReadStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub active_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadStats {
    pub today: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeInfo {
    pub datetime: String,
    pub is_valid: bool,
    pub time_source: String,
    pub timezone: String,
    pub timestamp: i64,
}
