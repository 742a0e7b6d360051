#![allow(clippy::manual_range_contains)]
pub mod changeset;
pub mod parser;
pub mod walk;

pub use changeset::{ChangeSet, MediaFile};
pub use parser::{ParseError, ParsedName};
pub use walk::{DiscoveryError, discover};
