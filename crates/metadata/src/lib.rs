pub mod cache;
pub mod provider;
pub mod tmdb;
pub mod transport;
pub mod tvdb;

#[cfg(test)]
pub(crate) mod fake;

use thiserror::Error;

pub use cache::{CachedProvider, LookupCache};
pub use provider::CatalogProvider;
pub use tmdb::TmdbClient;
pub use transport::{HttpTransport, Transport};
pub use tvdb::{TvdbClient, TvdbCredentials};

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
