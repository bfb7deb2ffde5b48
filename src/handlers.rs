use crate::{
    channel::{
        directory::ChannelDirectory,
        models::{
            Channel, ChannelCreateData, ChannelIdPathParams, ChannelPatch, ChannelUpdateData,
            DeletionResponseBody,
        },
        repository::ChannelRepository,
    },
    errors::ApiError,
    health::{HealthReporter, HealthResponseBody},
    http::{AppData, DataResponse, Json, Path},
};
use axum::http::StatusCode;

pub async fn get_channels<C>(
    AppData(data): AppData<ChannelDirectory<C>>,
) -> Result<DataResponse<Vec<Channel>>, ApiError>
where
    C: ChannelRepository + 'static,
{
    Ok(data.list_enabled().await?.into())
}

pub async fn get_channel_id<C>(
    AppData(data): AppData<ChannelDirectory<C>>,
    Path(path): Path<ChannelIdPathParams>,
) -> Result<DataResponse<Channel>, ApiError>
where
    C: ChannelRepository + 'static,
{
    Ok(data.get_by_id(path.id).await?.into())
}

pub async fn post_channel<C>(
    AppData(data): AppData<ChannelDirectory<C>>,
    Json(body): Json<ChannelCreateData>,
) -> Result<DataResponse<Channel>, ApiError>
where
    C: ChannelRepository + 'static,
{
    let chan = data.create(body).await?;

    Ok(DataResponse::with_status(chan, StatusCode::CREATED))
}

pub async fn put_channel_id<C>(
    AppData(data): AppData<ChannelDirectory<C>>,
    Path(path): Path<ChannelIdPathParams>,
    Json(body): Json<ChannelUpdateData>,
) -> Result<DataResponse<Channel>, ApiError>
where
    C: ChannelRepository + 'static,
{
    let patch = ChannelPatch::try_from(body)?;

    Ok(data.update(path.id, patch).await?.into())
}

pub async fn delete_channel_id<C>(
    AppData(data): AppData<ChannelDirectory<C>>,
    Path(path): Path<ChannelIdPathParams>,
) -> Result<DataResponse<DeletionResponseBody>, ApiError>
where
    C: ChannelRepository + 'static,
{
    data.delete(path.id).await?;

    Ok(DeletionResponseBody {
        message: format!("Channel {} deleted", path.id),
    }
    .into())
}

pub async fn get_health<C>(
    AppData(data): AppData<HealthReporter<C>>,
) -> DataResponse<HealthResponseBody>
where
    C: ChannelRepository + 'static,
{
    data.report().await.into()
}
