//! Content metadata for Marquee.
//!
//! Resolves the details shown next to the player (title, runtime, year,
//! rating) and the playable video source for a title. [`TmdbProvider`] talks
//! to The Movie Database; anything else can implement [`MetadataProvider`].

pub mod error;
pub mod model;
pub mod provider;
pub mod tmdb;

pub use error::{ProviderError, Result};
pub use model::{
    ContentDetails, MediaType, PlayableSource, RelatedTitle, SourceKind, SourceOrigin,
};
pub use provider::MetadataProvider;
pub use tmdb::TmdbProvider;
