// Wire-level types for every device resource, with the signatures and
// discriminators that narrow their responses.

pub mod auth;
pub mod card;
pub mod card_read;
pub mod config;
pub mod dashboard;
pub mod firmware;
pub mod log;
pub mod schedule;
pub mod wifi;

pub use auth::AuthResponse;
pub use card::{Card, CardDraft, CreatedCard, UnregisteredCard, UnregisteredCards};
pub use card_read::{CardRead, ReadsRemoved};
pub use config::{ConfigPayload, ConfigUpdate, DeviceConfig, DoorLockVariant};
pub use dashboard::DashboardStats;
pub use firmware::{FirmwareImage, FirmwareUpdateResponse, MAX_FIRMWARE_SIZE};
pub use log::LogEntry;
pub use schedule::{RestartSchedule, ScheduleDraft, ScheduleKind, ScheduleType, SchedulesCleared};
pub use wifi::{CurrentConnection, WifiCleared, WifiCredentials, WifiDeleted, WifiList, WifiNetwork};
