use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Reading or writing a persisted preference failed.
    #[error("preference storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Api(#[from] latchkey_api::Error),
}
