use reqwest::Method;

use crate::client::DeviceClient;
use crate::envelope::{Ack, Page, SUCCESS, Success};
use crate::error::Error;
use crate::models::card::{
    CARD_MUTATION_SUCCESS, CREATE_CARD_SUCCESS, Card, CardDraft, CardUpdate, CreatedCard,
    UnregisteredCard, UnregisteredCards,
};

impl DeviceClient {
    pub async fn list_cards(&self, page: u32, per_page: u32) -> Result<Page<Card>, Error> {
        let (page, _) = self.get_page("cards", page, per_page, &SUCCESS).await?;
        Ok(page)
    }

    /// Register a card. A duplicate number fails with [`Error::Conflict`],
    /// whose `data.card_number` names the clash.
    pub async fn create_card(&self, draft: &CardDraft) -> Result<Success<CreatedCard>, Error> {
        let req = self.request(Method::POST, "cards")?.json(draft);
        self.call(req).await?.narrow(&CREATE_CARD_SUCCESS)
    }

    pub async fn update_card(&self, id: u32, draft: &CardDraft) -> Result<Ack, Error> {
        let req = self
            .request(Method::PUT, "cards")?
            .json(&CardUpdate { id, draft });
        self.call(req).await?.narrow(&CARD_MUTATION_SUCCESS)
    }

    pub async fn delete_card(&self, id: u32) -> Result<Ack, Error> {
        let req = self
            .request(Method::DELETE, "cards")?
            .query(&[("card_id", id)]);
        self.call(req).await?.narrow(&CARD_MUTATION_SUCCESS)
    }

    pub async fn clear_cards(&self) -> Result<Ack, Error> {
        let req = self.request(Method::POST, "clear-cards")?;
        self.call(req).await?.narrow(&CARD_MUTATION_SUCCESS)
    }

    /// Recently read cards that are not registered.
    pub async fn list_unregistered_cards(&self) -> Result<UnregisteredCards, Error> {
        let req = self.request(Method::GET, "latest-card-reads")?;
        let env = self.call(req).await?.expect(&SUCCESS)?;

        let cards: Vec<UnregisteredCard> = if env.data.is_null() {
            Vec::new()
        } else {
            env.decode_data()?
        };
        let count = env
            .extra
            .get("count")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_else(|| u64::try_from(cards.len()).unwrap_or(u64::MAX));

        Ok(UnregisteredCards {
            count,
            timestamp: env.timestamp,
            cards,
        })
    }
}
