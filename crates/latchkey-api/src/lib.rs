// latchkey-api: Async Rust client for the latchkey access-control device REST API

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod resources;
pub mod session;
pub mod transport;

pub use client::DeviceClient;
pub use envelope::{Ack, Envelope, Page, Pagination, Reply, Signature, Status, Success};
pub use error::Error;
pub use session::{ConnectionDetails, MemoryStore, Session, SessionState, SessionStore};
pub use transport::TransportConfig;
