// Session context
//
// Connection details and the authorized flag, held in an atomically
// swapped snapshot and mirrored into a pluggable `SessionStore`. The
// HTTP client reads the snapshot on every request, so rotating the auth
// key or switching devices never requires rebuilding the client.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Base URL used when no device has been connected yet.
///
/// The device's soft-AP address on first boot.
pub const FALLBACK_BASE_URL: &str = "http://192.168.4.1/api/";

/// The `{ip, port, auth_key}` triple identifying a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDetails {
    pub ip: String,
    pub port: u16,
    #[serde(with = "secret_string")]
    pub auth_key: SecretString,
}

impl ConnectionDetails {
    pub fn new(ip: impl Into<String>, port: u16, auth_key: SecretString) -> Self {
        Self {
            ip: ip.into(),
            port,
            auth_key,
        }
    }

    /// `http://{ip}:{port}/api/` for this device.
    pub fn base_url(&self) -> Result<Url, Error> {
        let url = Url::parse(&format!("http://{}:{}/api/", self.ip, self.port))?;
        Ok(url)
    }
}

impl PartialEq for ConnectionDetails {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip
            && self.port == other.port
            && self.auth_key.expose_secret() == other.auth_key.expose_secret()
    }
}

/// Everything persisted between invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub connection: Option<ConnectionDetails>,
    #[serde(default)]
    pub authorized: bool,
}

/// Persistence backend for the session context.
///
/// `load` runs when a [`Session`] is created or refreshed; `save` runs
/// after every mutation. Implementations do no locking of their own.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<SessionState, Error>;
    fn save(&self, state: &SessionState) -> Result<(), Error>;
}

/// Process-local store, used by tests and one-shot tooling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<SessionState>,
}

impl MemoryStore {
    pub fn new(state: SessionState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<SessionState, Error> {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| Error::Session("memory store lock poisoned".into()))
    }

    fn save(&self, state: &SessionState) -> Result<(), Error> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| Error::Session("memory store lock poisoned".into()))?;
        *guard = state.clone();
        Ok(())
    }
}

/// Shared session context handed to the HTTP client.
pub struct Session {
    store: Arc<dyn SessionStore>,
    state: ArcSwap<SessionState>,
}

impl Session {
    /// Load the session from `store`.
    pub fn load(store: Arc<dyn SessionStore>) -> Result<Self, Error> {
        let state = store.load()?;
        debug!(
            connected = state.connection.is_some(),
            authorized = state.authorized,
            "session loaded"
        );
        Ok(Self {
            store,
            state: ArcSwap::from_pointee(state),
        })
    }

    /// An empty session backed by a [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            state: ArcSwap::from_pointee(SessionState::default()),
        }
    }

    /// Re-read the backing store, discarding the in-memory snapshot.
    pub fn refresh(&self) -> Result<(), Error> {
        let state = self.store.load()?;
        self.state.store(Arc::new(state));
        Ok(())
    }

    /// Write the current snapshot to the backing store.
    pub fn save(&self) -> Result<(), Error> {
        self.store.save(&self.state.load())
    }

    pub fn snapshot(&self) -> Arc<SessionState> {
        self.state.load_full()
    }

    pub fn connection(&self) -> Option<ConnectionDetails> {
        self.state.load().connection.clone()
    }

    pub fn is_authorized(&self) -> bool {
        self.state.load().authorized
    }

    /// Base URL for the next request, or the fallback when disconnected.
    pub fn base_url(&self) -> Result<Url, Error> {
        match self.state.load().connection {
            Some(ref details) => details.base_url(),
            None => Ok(Url::parse(FALLBACK_BASE_URL)?),
        }
    }

    /// Current auth key, if a device is connected.
    pub fn auth_key(&self) -> Option<SecretString> {
        self.state
            .load()
            .connection
            .as_ref()
            .map(|c| c.auth_key.clone())
    }

    pub fn set_connection(&self, details: ConnectionDetails) -> Result<(), Error> {
        self.update(|state| state.connection = Some(details))
    }

    pub fn set_authorized(&self, authorized: bool) -> Result<(), Error> {
        self.update(|state| state.authorized = authorized)
    }

    /// Replace the stored auth key, keeping ip and port.
    pub fn rotate_auth_key(&self, auth_key: SecretString) -> Result<(), Error> {
        self.update(|state| {
            if let Some(ref mut details) = state.connection {
                details.auth_key = auth_key;
            }
        })
    }

    /// Drop the authorized flag and the stored connection.
    pub fn clear(&self) -> Result<(), Error> {
        self.update(|state| *state = SessionState::default())
    }

    fn update(&self, mutate: impl FnOnce(&mut SessionState)) -> Result<(), Error> {
        let mut next = SessionState::clone(&self.state.load());
        mutate(&mut next);
        self.store.save(&next)?;
        self.state.store(Arc::new(next));
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state.load_full())
            .finish_non_exhaustive()
    }
}

pub(crate) mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(secret: &SecretString, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(secret.expose_secret())
    }

    /// Serialize as a fixed mask, for values that end up in command output.
    pub fn serialize_masked<S: Serializer>(_: &SecretString, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str("********")
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<SecretString, D::Error> {
        String::deserialize(de).map(SecretString::from)
    }
}
