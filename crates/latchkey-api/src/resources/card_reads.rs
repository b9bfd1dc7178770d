use reqwest::Method;

use crate::client::DeviceClient;
use crate::envelope::{Ack, Page, Success};
use crate::error::Error;
use crate::models::card_read::{
    CardRead, DELETE_ALL_CARD_READS_SUCCESS, DELETE_CARD_READ_SUCCESS, FETCH_CARD_READS_SUCCESS,
    ReadsRemoved,
};

impl DeviceClient {
    pub async fn list_card_reads(&self, page: u32, per_page: u32) -> Result<Page<CardRead>, Error> {
        let (page, _) = self
            .get_page("card-reads", page, per_page, &FETCH_CARD_READS_SUCCESS)
            .await?;
        Ok(page)
    }

    pub async fn delete_card_read(&self, id: u32) -> Result<Ack, Error> {
        let req = self
            .request(Method::DELETE, "card-reads")?
            .query(&[("read_id", id)]);
        self.call(req).await?.narrow(&DELETE_CARD_READ_SUCCESS)
    }

    /// Remove every stored read. A 401 surfaces as [`Error::Unauthorized`],
    /// a 500 as [`Error::Api`].
    pub async fn clear_card_reads(&self) -> Result<Success<ReadsRemoved>, Error> {
        let req = self.request(Method::DELETE, "card-reads")?;
        self.call(req).await?.narrow(&DELETE_ALL_CARD_READS_SUCCESS)
    }
}
