use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, trace};

use crate::client::{DeviceClient, normalize_failure};
use crate::error::{DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE, Error};
use crate::models::firmware::{
    FirmwareImage, FirmwareUpdateResponse, ProgressFn, UPLOAD_CHUNK_SIZE, as_megabytes, percent,
};
use crate::transport::FIRMWARE_TIMEOUT;

impl DeviceClient {
    /// Upload and flash a firmware image.
    ///
    /// Oversized images are rejected before any request is made. `progress`
    /// receives an integer percentage for every chunk handed to the
    /// transport, and a final `100` for an empty image.
    pub async fn upload_firmware(
        &self,
        image: &FirmwareImage,
        progress: Option<ProgressFn>,
    ) -> Result<FirmwareUpdateResponse, Error> {
        image.check_size()?;

        let total = image.size();
        debug!(
            file = %image.file_name,
            size = format!("{:.2}MB", as_megabytes(total)),
            "starting firmware upload"
        );

        // An empty body yields no chunks, so completion is reported after the send.
        let on_done = progress.clone().filter(|_| total == 0);
        let bytes = image.bytes.clone();
        let chunks = async_stream::stream! {
            let mut offset = 0;
            while offset < bytes.len() {
                let end = (offset + UPLOAD_CHUNK_SIZE).min(bytes.len());
                let chunk = bytes.slice(offset..end);
                offset = end;

                let pct = percent(u64::try_from(offset).unwrap_or(total), total);
                trace!(pct, "upload progress");
                if let Some(ref report) = progress {
                    report(pct);
                }
                yield Ok::<_, std::io::Error>(chunk);
            }
        };

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(chunks), total)
            .file_name(image.file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| Error::Setup(e.to_string()))?;
        let form = Form::new().part("firmware", part);

        let req = self
            .request(Method::POST, "firmware-update")?
            .multipart(form);
        let (status, body) = self.send_raw(req, FIRMWARE_TIMEOUT).await?;
        if let Some(report) = on_done {
            report(100);
        }
        if !status.is_success() {
            return Err(normalize_failure(status, &body));
        }

        let resp: FirmwareUpdateResponse =
            serde_json::from_str(&body).map_err(|e| Error::InvalidResponse {
                reason: format!("firmware response: {e}"),
                body: body.clone(),
            })?;
        if !resp.success {
            let message = if resp.message.is_empty() {
                DEFAULT_ERROR_MESSAGE.to_owned()
            } else {
                resp.message
            };
            return Err(Error::Api {
                message,
                code: DEFAULT_ERROR_CODE.to_owned(),
                status: Some(status.as_u16()),
            });
        }

        info!("firmware upload completed");
        Ok(resp)
    }
}
