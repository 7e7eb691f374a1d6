use async_trait::async_trait;

use crate::error::Result;
use crate::model::{ContentDetails, MediaType, PlayableSource, RelatedTitle, SourceKind};

/// Source of title metadata and playable video URLs.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_details(&self, id: u64, media_type: MediaType) -> Result<ContentDetails>;

    /// Resolve a playable source of the requested class, or `None` when the
    /// title has nothing that can be played.
    async fn fetch_playable_source(
        &self,
        id: u64,
        media_type: MediaType,
        kind: SourceKind,
    ) -> Result<Option<PlayableSource>>;

    async fn fetch_similar(&self, id: u64, media_type: MediaType) -> Result<Vec<RelatedTitle>>;
}
