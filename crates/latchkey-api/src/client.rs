// HTTP client wrapper for the device REST API.
//
// Base URL and `X-Auth-Key` are read from the session on every request,
// never captured at construction. Every response is reduced to an
// `Envelope` (or a normalized `Error`) before resource code sees it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::envelope::{Envelope, Failure, Page, Reply, Signature, Success};
use crate::error::{DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE, Error};
use crate::session::Session;
use crate::transport::TransportConfig;

/// Header carrying the pre-shared device key.
pub const AUTH_HEADER: &str = "X-Auth-Key";

// ── Error body shape for non-envelope failures ──────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for one device, addressed through a shared [`Session`].
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    session: Arc<Session>,
    timeout: Duration,
}

impl DeviceClient {
    pub fn new(session: Arc<Session>, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            session,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(http: reqwest::Client, session: Arc<Session>, timeout: Duration) -> Self {
        Self {
            http,
            session,
            timeout,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── Request building ────────────────────────────────────────────

    /// Join a relative path (e.g. `"cards"`) onto the current base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.session.base_url()?.join(path)?)
    }

    /// Start a request with the auth header taken from the session as it
    /// is right now.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(key) = self.session.auth_key() {
            let mut value =
                HeaderValue::from_str(key.expose_secret()).map_err(|e| Error::Validation {
                    field: "auth_key".into(),
                    message: format!("not a valid header value: {e}"),
                })?;
            value.set_sensitive(true);
            builder = builder.header(AUTH_HEADER, value);
        }
        Ok(builder)
    }

    // ── Dispatch ────────────────────────────────────────────────────

    /// Send with the client's default timeout.
    pub(crate) async fn call(&self, builder: RequestBuilder) -> Result<Exchange, Error> {
        self.call_with_timeout(builder, self.timeout).await
    }

    /// Send with an explicit timeout for this request only.
    pub(crate) async fn call_with_timeout(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<Exchange, Error> {
        let (status, body) = self.send_raw(builder, timeout).await?;
        into_exchange(status, &body)
    }

    /// Send and return the status and raw body, without envelope handling.
    pub(crate) async fn send_raw(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<(StatusCode, String), Error> {
        let timeout_secs = timeout.as_secs();
        let resp = builder.timeout(timeout).send().await.map_err(|e| {
            warn!(error = %e, "request failed without a response");
            Error::no_response(&e, timeout_secs)
        })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::no_response(&e, timeout_secs))?;
        trace!(%status, %body, "response");
        Ok((status, body))
    }

    // ── Verb helpers ────────────────────────────────────────────────

    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
        success: &Signature,
    ) -> Result<(Page<T>, Envelope), Error> {
        let builder = self
            .request(Method::GET, path)?
            .query(&[("page", page), ("per_page", per_page)]);
        let env = self.call(builder).await?.expect(success)?;
        Ok((env.decode_page()?, env))
    }
}

// ── Exchange ────────────────────────────────────────────────────────

/// One completed round trip whose body was a discriminable envelope.
#[derive(Debug)]
pub(crate) struct Exchange {
    pub status: StatusCode,
    pub envelope: Envelope,
}

impl Exchange {
    /// Narrow into `T`, normalizing a device-signaled failure.
    pub fn narrow<T: DeserializeOwned>(self, success: &Signature) -> Result<Success<T>, Error> {
        let status = self.effective_status();
        match Reply::narrow(self.envelope, success)? {
            Reply::Success(ok) => Ok(ok),
            Reply::Failure(failure) => Err(fail(failure, status)),
        }
    }

    /// Check the signature but keep the raw envelope for callers that need
    /// top-level fields beside `data`.
    pub fn expect(self, success: &Signature) -> Result<Envelope, Error> {
        let status = self.effective_status();
        self.envelope
            .check(success)?
            .map_err(|failure| fail(failure, status))
    }

    /// The envelope's own code wins over the HTTP status.
    fn effective_status(&self) -> Option<u16> {
        self.envelope.code().or(Some(self.status.as_u16()))
    }
}

fn fail(failure: Failure, status: Option<u16>) -> Error {
    warn!(
        kind = ?failure.kind,
        code = ?failure.code,
        message = failure.display_message(),
        "device reported an error"
    );
    failure.into_error(status)
}

/// Turn a raw response into an [`Exchange`], or a normalized error when the
/// body is not an envelope.
pub(crate) fn into_exchange(status: StatusCode, body: &str) -> Result<Exchange, Error> {
    match Envelope::parse(body) {
        Ok(envelope) if envelope.status().is_some() => Ok(Exchange { status, envelope }),
        Ok(_) | Err(_) if !status.is_success() => Err(normalize_failure(status, body)),
        Ok(_) => Err(Error::InvalidResponse {
            reason: "response has no status tag".into(),
            body: body.to_owned(),
        }),
        Err(e) => Err(e),
    }
}

/// `{message, code}` from a non-envelope error body, with defaults.
pub(crate) fn normalize_failure(status: StatusCode, body: &str) -> Error {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let (message, code) = parsed.map_or((None, None), |b| (b.message, b.code));
    let code = code.and_then(|c| match c {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    let err = Error::Api {
        message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned()),
        code: code.unwrap_or_else(|| DEFAULT_ERROR_CODE.to_owned()),
        status: Some(status.as_u16()),
    };
    warn!(%status, error = %err, "request failed");
    err
}
