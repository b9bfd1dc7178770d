use reqwest::Method;

use crate::client::{DeviceClient, into_exchange};
use crate::envelope::SUCCESS;
use crate::error::Error;
use crate::models::dashboard::DashboardStats;

impl DeviceClient {
    /// Live telemetry. The body is the stats object itself, tagged with
    /// `status` at the top level.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        let req = self.request(Method::POST, "stats")?;
        let (status, body) = self.send_raw(req, self.timeout()).await?;
        into_exchange(status, &body)?.expect(&SUCCESS)?;

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse {
            reason: format!("stats body does not match the declared shape: {e}"),
            body,
        })
    }
}
