use super::models::{Channel, ChannelFilter, ChannelPatch};
use crate::errors::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait ChannelRepository: Sync + Send {
    async fn find(&self, filter: ChannelFilter) -> Result<Vec<Channel>, ApiError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Channel>, ApiError>;

    /// Inserts `channel` unless its id is taken, in which case
    /// [`ApiError::ChannelAlreadyExists`] is returned. The check and the
    /// insert must be a single atomic operation of the store.
    async fn insert(&self, channel: Channel) -> Result<Channel, ApiError>;

    /// Writes only the fields present in `patch` and returns the full
    /// record. Reading the current values and writing the new ones must be
    /// a single atomic operation of the store, so concurrent updates of
    /// disjoint fields all survive.
    async fn update(&self, id: i64, patch: ChannelPatch) -> Result<Channel, ApiError>;

    async fn delete(&self, id: i64) -> Result<(), ApiError>;

    async fn ping(&self) -> bool;

    async fn close(&self) {}
}
