use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum Error {
    /// Deserialize event error.
    #[error("deserialize event error: {0}")]
    DeserializeEvent(serde_json::Error),
    /// Read write lock error.
    #[error("could not get read/write lock")]
    RwPoison,
    /// Unable to serialize event.
    #[error("serialize event error: {0}")]
    SerializeEvent(serde_json::Error),
}

impl From<Error> for foldcast::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::DeserializeEvent(err) => foldcast::Error::DeserializeEvent(err),
            Error::RwPoison => foldcast::Error::store_unavailable("could not get read/write lock"),
            Error::SerializeEvent(err) => foldcast::Error::SerializeEvent(err),
        }
    }
}
