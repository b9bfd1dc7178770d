use std::borrow::Borrow;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Largest image the device accepts: 2 MiB.
pub const MAX_FIRMWARE_SIZE: u64 = 2 * 1024 * 1024;

/// Upload chunk size; one progress event per chunk.
pub(crate) const UPLOAD_CHUNK_SIZE: usize = 16 * 1024;

/// Receives an integer percentage on every progress event.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn as_megabytes<B: Borrow<u64>>(bytes: B) -> f64 {
    *bytes.borrow() as f64 / (1024.0 * 1024.0)
}

/// `loaded * 100 / total`, rounded, clamped to 100.
pub(crate) fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (u128::from(loaded) * 100 + u128::from(total) / 2) / u128::from(total);
    u8::try_from(pct.min(100)).unwrap_or(100)
}

/// A firmware binary held in memory, ready to upload.
#[derive(Debug, Clone)]
pub struct FirmwareImage {
    pub file_name: String,
    pub bytes: Bytes,
}

impl FirmwareImage {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an image from disk.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "firmware.bin".to_owned(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }

    /// Reject images above [`MAX_FIRMWARE_SIZE`].
    pub fn check_size(&self) -> Result<(), Error> {
        let size = self.size();
        if size > MAX_FIRMWARE_SIZE {
            return Err(Error::FirmwareTooLarge {
                size,
                max: MAX_FIRMWARE_SIZE,
            });
        }
        Ok(())
    }
}

/// Body returned by `POST /firmware-update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub progress: Option<u8>,
}
