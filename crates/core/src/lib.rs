pub mod error;
pub mod types;

pub use error::ItemError;
pub use types::{Episode, Movie, ProviderKind, Season, Show};
