use reqwest::Method;

use crate::client::DeviceClient;
use crate::envelope::{Ack, SUCCESS, Success};
use crate::error::Error;
use crate::models::wifi::{
    CREATE_WIFI_SUCCESS, CurrentConnection, DELETE_ALL_WIFI_SUCCESS, DELETE_WIFI_SUCCESS,
    UPDATE_WIFI_SUCCESS, WifiCleared, WifiCredentials, WifiDeleted, WifiList,
};

impl DeviceClient {
    pub async fn list_wifi_networks(&self, page: u32, per_page: u32) -> Result<WifiList, Error> {
        let (page, env) = self.get_page("wifi", page, per_page, &SUCCESS).await?;
        let current_connection = env
            .extra
            .get("current_connection")
            .filter(|v| !v.is_null())
            .map(|v| serde_json::from_value::<CurrentConnection>(v.clone()))
            .transpose()
            .map_err(|e| Error::InvalidResponse {
                reason: format!("current_connection: {e}"),
                body: serde_json::to_string(&env.extra).unwrap_or_default(),
            })?;
        Ok(WifiList {
            page,
            current_connection,
        })
    }

    pub async fn create_wifi_network(&self, creds: &WifiCredentials) -> Result<Ack, Error> {
        let req = self.request(Method::POST, "wifi")?.json(creds);
        self.call(req).await?.narrow(&CREATE_WIFI_SUCCESS)
    }

    pub async fn update_wifi_network(
        &self,
        id: u32,
        creds: &WifiCredentials,
    ) -> Result<Ack, Error> {
        let req = self.request(Method::PUT, &format!("wifi/{id}"))?.json(creds);
        self.call(req).await?.narrow(&UPDATE_WIFI_SUCCESS)
    }

    pub async fn delete_wifi_network(&self, id: u32) -> Result<Success<WifiDeleted>, Error> {
        let req = self.request(Method::DELETE, &format!("wifi/{id}"))?;
        self.call(req).await?.narrow(&DELETE_WIFI_SUCCESS)
    }

    /// Remove all stored networks; the factory credentials survive.
    pub async fn clear_wifi_networks(&self) -> Result<Success<WifiCleared>, Error> {
        let req = self.request(Method::DELETE, "wifi")?;
        self.call(req).await?.narrow(&DELETE_ALL_WIFI_SUCCESS)
    }
}
