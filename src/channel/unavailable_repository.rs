use super::{
    models::{Channel, ChannelFilter, ChannelPatch},
    repository::ChannelRepository,
};
use crate::errors::ApiError;
use async_trait::async_trait;

/// A store whose backend is unreachable: every operation fails and pings
/// report a lost connection.
#[derive(Clone, Copy)]
pub struct UnavailableChannelRepository;

#[async_trait]
impl ChannelRepository for UnavailableChannelRepository {
    async fn find(&self, _filter: ChannelFilter) -> Result<Vec<Channel>, ApiError> {
        Err(ApiError::StoreUnavailable)
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<Channel>, ApiError> {
        Err(ApiError::StoreUnavailable)
    }

    async fn insert(&self, _channel: Channel) -> Result<Channel, ApiError> {
        Err(ApiError::StoreUnavailable)
    }

    async fn update(&self, _id: i64, _patch: ChannelPatch) -> Result<Channel, ApiError> {
        Err(ApiError::StoreUnavailable)
    }

    async fn delete(&self, _id: i64) -> Result<(), ApiError> {
        Err(ApiError::StoreUnavailable)
    }

    async fn ping(&self) -> bool {
        false
    }
}
