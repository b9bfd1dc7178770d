use reqwest::Method;

use crate::client::DeviceClient;
use crate::envelope::{Ack, Page};
use crate::error::Error;
use crate::models::log::{CLEAR_LOGS_SUCCESS, DELETE_LOG_SUCCESS, FETCH_LOGS_SUCCESS, LogEntry};

impl DeviceClient {
    pub async fn list_logs(&self, page: u32, per_page: u32) -> Result<Page<LogEntry>, Error> {
        let (page, _) = self
            .get_page("logs", page, per_page, &FETCH_LOGS_SUCCESS)
            .await?;
        Ok(page)
    }

    pub async fn delete_log(&self, id: &str) -> Result<Ack, Error> {
        let req = self.request(Method::DELETE, "logs")?.query(&[("id", id)]);
        self.call(req).await?.narrow(&DELETE_LOG_SUCCESS)
    }

    pub async fn clear_logs(&self) -> Result<Ack, Error> {
        let req = self.request(Method::POST, "clear-logs")?;
        self.call(req).await?.narrow(&CLEAR_LOGS_SUCCESS)
    }
}
