use crate::{
    channel::{directory::ChannelDirectory, repository::ChannelRepository},
    handlers,
    health::HealthReporter,
    http::AppData,
    setup::JsonPanicHandler,
};
use axum::{routing, Router};
use tower_http::catch_panic::CatchPanicLayer;
use utoipa_swagger_ui::SwaggerUi;

/// Builds every route of the service over `channel_repo`. The interactive
/// documentation and its JSON description are only routed when `docs` is
/// provided.
pub fn build_router<C>(channel_repo: C, docs: Option<utoipa::openapi::OpenApi>) -> Router
where
    C: ChannelRepository + Clone + 'static,
{
    let mut app = Router::new()
        .route(
            "/channels",
            routing::get(handlers::get_channels::<C>).post(handlers::post_channel::<C>),
        )
        .route(
            "/channels/:id",
            routing::get(handlers::get_channel_id::<C>)
                .put(handlers::put_channel_id::<C>)
                .delete(handlers::delete_channel_id::<C>),
        )
        .route("/health", routing::get(handlers::get_health::<C>));

    if let Some(doc) = docs {
        app = app.merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", doc));
    }

    app = app
        .layer(AppData::extension(HealthReporter::new(channel_repo.clone())))
        .layer(AppData::extension(ChannelDirectory::new(channel_repo)))
        .layer(CatchPanicLayer::custom(JsonPanicHandler));

    #[cfg(feature = "http-trace")]
    {
        app = app.layer(tower_http::trace::TraceLayer::new_for_http());
    }

    app
}
