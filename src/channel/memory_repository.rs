use super::{
    models::{Channel, ChannelFilter, ChannelPatch},
    repository::ChannelRepository,
};
use crate::errors::ApiError;
use async_trait::async_trait;
use std::{
    collections::{btree_map::Entry, BTreeMap},
    sync::Arc,
};
use tokio::sync::Mutex;

#[derive(Default, Clone)]
pub struct InMemoryChannelRepository(Arc<Mutex<BTreeMap<i64, Channel>>>);

impl InMemoryChannelRepository {
    #[inline]
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(BTreeMap::new())))
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn find(&self, filter: ChannelFilter) -> Result<Vec<Channel>, ApiError> {
        let lock = self.0.lock().await;
        let arr = lock
            .values()
            .filter(|chan| filter.matches(chan))
            .cloned()
            .collect();
        drop(lock);

        Ok(arr)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Channel>, ApiError> {
        let lock = self.0.lock().await;
        let chan = lock.get(&id).cloned();
        drop(lock);

        Ok(chan)
    }

    async fn insert(&self, channel: Channel) -> Result<Channel, ApiError> {
        let mut lock = self.0.lock().await;

        match lock.entry(channel.id) {
            Entry::Occupied(_) => Err(ApiError::ChannelAlreadyExists(channel.id)),
            Entry::Vacant(v) => Ok(v.insert(channel).clone()),
        }
    }

    async fn update(&self, id: i64, patch: ChannelPatch) -> Result<Channel, ApiError> {
        let mut lock = self.0.lock().await;

        match lock.get_mut(&id) {
            Some(v) => {
                *v = v.clone().merge(patch);
                Ok(v.clone())
            }
            None => Err(ApiError::ChannelNotFound(id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let mut lock = self.0.lock().await;
        let chan = lock.remove(&id);
        drop(lock);

        if chan.is_some() {
            Ok(())
        } else {
            Err(ApiError::ChannelNotFound(id))
        }
    }

    async fn ping(&self) -> bool {
        true
    }
}
