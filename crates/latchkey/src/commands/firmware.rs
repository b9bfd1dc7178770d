//! Firmware upload with a progress bar.

use std::sync::Arc;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};

use latchkey_api::models::FirmwareImage;
use latchkey_api::models::firmware::ProgressFn;

use crate::cli::FirmwareArgs;
use crate::error::CliError;

use super::{Ctx, util};

fn progress_bar(hidden: bool) -> Result<ProgressBar, CliError> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let style = ProgressStyle::with_template("{msg} [{bar:40}] {pos:>3}%")
        .map_err(|e| CliError::Internal(e.to_string()))?
        .progress_chars("=> ");
    let bar = ProgressBar::new(100).with_style(style);
    bar.set_message("Uploading");
    Ok(bar)
}

pub async fn handle(ctx: &mut Ctx, args: FirmwareArgs) -> Result<(), CliError> {
    let image = FirmwareImage::read(&args.path).await?;
    image.check_size()?;

    let size = ByteSize::b(image.size()).to_string_as(true);
    if !util::confirm(
        "firmware",
        &format!(
            "Flash {} ({size})? The device restarts when the upload completes.",
            image.file_name
        ),
        ctx.yes,
    )? {
        return Ok(());
    }

    let bar = progress_bar(ctx.quiet)?;
    let report = bar.clone();
    let progress: ProgressFn = Arc::new(move |pct: u8| report.set_position(u64::from(pct)));

    let result = ctx.client.upload_firmware(&image, Some(progress)).await;
    bar.finish_and_clear();
    let resp = result?;

    let message = if resp.message.is_empty() {
        format!("Uploaded {} ({size})", image.file_name)
    } else {
        resp.message
    };
    ctx.success(message);
    ctx.info("The device is restarting; log in again once it is back");
    Ok(())
}
