//! Error type shared by the gallery modules

use thiserror::Error;

pub type GalleryResult<T> = Result<T, GalleryError>;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// Transport failure (DNS, TLS, connection reset, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-2xx status
    #[error("HTTP error {status}")]
    Http { status: u16 },

    #[error("could not decode character record: {0}")]
    Decode(String),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    /// No card with this id is currently displayed
    #[error("no character with id '{0}' in the current view")]
    UnknownCharacter(String),
}
