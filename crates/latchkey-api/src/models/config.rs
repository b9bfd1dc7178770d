use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::envelope::{SUCCESS, Signature};
use crate::session::secret_string;

/// Lock hardware fitted to the door.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DoorLockVariant {
    Solenoid,
    Magnetic,
}

/// Device configuration as returned by `GET /config`.
///
/// The auth key is masked whenever this value is serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(
        serialize_with = "secret_string::serialize_masked",
        deserialize_with = "secret_string::deserialize"
    )]
    pub auth_key: SecretString,
    pub door_lock_variant: DoorLockVariant,
    pub door_lock_duration: u32,
    pub run_program_without_time: bool,
    pub active: bool,
}

/// Inner body of `PUT /config`. `current_auth_key` authorizes the change.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPayload {
    #[serde(with = "secret_string")]
    pub current_auth_key: SecretString,
    #[serde(with = "secret_string")]
    pub auth_key: SecretString,
    pub door_lock_variant: DoorLockVariant,
    pub door_lock_duration: u32,
    pub run_program_without_time: bool,
    pub active: bool,
}

impl ConfigPayload {
    /// Start from the current configuration, keeping its key.
    pub fn from_current(config: &DeviceConfig) -> Self {
        Self {
            current_auth_key: config.auth_key.clone(),
            auth_key: config.auth_key.clone(),
            door_lock_variant: config.door_lock_variant,
            door_lock_duration: config.door_lock_duration,
            run_program_without_time: config.run_program_without_time,
            active: config.active,
        }
    }

    pub fn changes_auth_key(&self) -> bool {
        self.current_auth_key.expose_secret() != self.auth_key.expose_secret()
    }
}

/// `{config: {...}}` wrapper the device expects.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigUpdate {
    pub config: ConfigPayload,
}

pub const GET_CONFIG_SUCCESS: Signature = SUCCESS;
pub const UPDATE_CONFIG_SUCCESS: Signature = SUCCESS;
