use reqwest::Method;
use tracing::info;

use crate::client::DeviceClient;
use crate::envelope::Ack;
use crate::error::Error;
use crate::models::config::{
    ConfigPayload, ConfigUpdate, DeviceConfig, GET_CONFIG_SUCCESS, UPDATE_CONFIG_SUCCESS,
};

impl DeviceClient {
    pub async fn get_config(&self) -> Result<DeviceConfig, Error> {
        let req = self.request(Method::GET, "config")?;
        Ok(self.call(req).await?.narrow(&GET_CONFIG_SUCCESS)?.data)
    }

    /// Push a new configuration. When the key changes, the session is
    /// rotated so the next request already uses the new one.
    pub async fn update_config(&self, payload: ConfigPayload) -> Result<Ack, Error> {
        let rotate = payload.changes_auth_key().then(|| payload.auth_key.clone());
        let req = self
            .request(Method::PUT, "config")?
            .json(&ConfigUpdate { config: payload });
        let ack = self.call(req).await?.narrow(&UPDATE_CONFIG_SUCCESS)?;

        if let Some(key) = rotate {
            self.session().rotate_auth_key(key)?;
            info!("auth key rotated");
        }
        Ok(ack)
    }
}
