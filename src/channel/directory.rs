use super::{
    models::{Channel, ChannelCreateData, ChannelFilter, ChannelPatch},
    repository::ChannelRepository,
};
use crate::errors::ApiError;

/// Business rules over a [`ChannelRepository`]. Holds no state of its own,
/// every call is a single unit of work against the store.
pub struct ChannelDirectory<C: ChannelRepository> {
    channel_repo: C,
}

impl<C: ChannelRepository> ChannelDirectory<C> {
    pub fn new(channel_repo: C) -> Self {
        Self { channel_repo }
    }

    pub async fn list_enabled(&self) -> Result<Vec<Channel>, ApiError> {
        self.channel_repo.find(ChannelFilter::enabled_only()).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Channel, ApiError> {
        self.channel_repo
            .get_by_id(id)
            .await?
            .ok_or(ApiError::ChannelNotFound(id))
    }

    pub async fn create(&self, data: ChannelCreateData) -> Result<Channel, ApiError> {
        let chan = self.channel_repo.insert(data.into_channel()?).await?;
        tracing::info!(channel_id = chan.id, "Channel created");

        Ok(chan)
    }

    pub async fn update(&self, id: i64, patch: ChannelPatch) -> Result<Channel, ApiError> {
        if let Some(body_id) = patch.id {
            if body_id != id {
                return Err(ApiError::ChannelIdImmutable { path: id, body: body_id });
            }
        }

        let chan = self.channel_repo.update(id, patch).await?;
        tracing::info!(channel_id = id, "Channel updated");

        Ok(chan)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.channel_repo.delete(id).await?;
        tracing::info!(channel_id = id, "Channel deleted");

        Ok(())
    }
}
