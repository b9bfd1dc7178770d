// Pre-shared key login.
//
// The connection details are persisted before the device is asked, so the
// request that verifies them already uses them. Any failure reverts the
// session to logged-out.

use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::auth::{
    AUTH_FAILED_MESSAGE, AuthResponse, DEVICE_ERROR_MESSAGE, INVALID_KEY_MESSAGE,
    NETWORK_ERROR_MESSAGE,
};
use crate::session::ConnectionDetails;

impl DeviceClient {
    /// Authenticate against `ip:port` with `auth_key`.
    ///
    /// On success the session holds the connection and the authorized flag.
    /// On failure both are cleared and [`Error::Authentication`] carries the
    /// message to show.
    pub async fn login(&self, ip: &str, port: u16, auth_key: SecretString) -> Result<bool, Error> {
        let session = self.session();
        session.set_connection(ConnectionDetails::new(ip, port, auth_key))?;
        debug!(ip, port, "connection stored, verifying key");

        if let Err(err) = self.verify_auth_key().await {
            session.clear()?;
            warn!(ip, port, %err, "authentication failed");
            return Err(err);
        }

        if let Err(err) = session.set_authorized(true) {
            warn!(ip, port, %err, "could not persist the session, reverting");
            session.clear()?;
            return Err(err);
        }
        info!(ip, port, "authenticated");
        Ok(true)
    }

    /// Drop the authorized flag. The connection stays for pre-filling.
    pub fn logout(&self) -> Result<(), Error> {
        self.session().set_authorized(false)
    }

    pub fn is_authorized(&self) -> bool {
        self.session().is_authorized()
    }

    async fn verify_auth_key(&self) -> Result<(), Error> {
        let rejected = |message: &str, responded: bool| Error::Authentication {
            message: message.to_owned(),
            responded,
        };

        let req = self
            .request(Method::POST, "auth-key")
            .map_err(|_| rejected(AUTH_FAILED_MESSAGE, false))?;

        let (status, body) = self
            .send_raw(req, self.timeout())
            .await
            .map_err(|_| rejected(NETWORK_ERROR_MESSAGE, false))?;

        match status {
            StatusCode::BAD_REQUEST => Err(rejected(INVALID_KEY_MESSAGE, true)),
            StatusCode::INTERNAL_SERVER_ERROR => Err(rejected(DEVICE_ERROR_MESSAGE, true)),
            s if s.is_success() => match serde_json::from_str::<AuthResponse>(&body) {
                Ok(AuthResponse { success: true }) => Ok(()),
                _ => Err(rejected(AUTH_FAILED_MESSAGE, true)),
            },
            _ => Err(rejected(AUTH_FAILED_MESSAGE, true)),
        }
    }
}
