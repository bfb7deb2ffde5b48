//! The OpenAPI description of the service.
//!
//! Schemas are derived from the model types and the routes are declared by
//! the stubs below, so nothing here depends on handler code.

use crate::{
    channel::models::{Channel, ChannelCreateData, ChannelUpdateData, DeletionResponseBody},
    errors::ErrorBody,
    health::HealthResponseBody,
};
use utoipa::{openapi::Server, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TV Channel Directory",
        description = "Lists enabled TV channels and manages channel records"
    ),
    paths(
        list_channels,
        get_channel,
        create_channel,
        update_channel,
        delete_channel,
        health_check
    ),
    components(schemas(
        Channel,
        ChannelCreateData,
        ChannelUpdateData,
        DeletionResponseBody,
        HealthResponseBody,
        ErrorBody
    )),
    tags((name = "channels", description = "Channel records"))
)]
pub struct ApiDoc;

/// The description advertising `public_url` as its only server.
pub fn openapi(public_url: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(public_url)]);

    doc
}

#[utoipa::path(
    get,
    path = "/channels",
    tag = "channels",
    responses(
        (status = 200, description = "Every enabled channel", body = [Channel]),
        (status = 500, description = "The store is unavailable", body = ErrorBody)
    )
)]
#[allow(dead_code)]
fn list_channels() {}

#[utoipa::path(
    get,
    path = "/channels/{id}",
    tag = "channels",
    params(("id" = i64, Path, description = "Channel id")),
    responses(
        (status = 200, description = "The channel", body = Channel),
        (status = 400, description = "The id is not an integer", body = ErrorBody),
        (status = 404, description = "No channel has this id", body = ErrorBody)
    )
)]
#[allow(dead_code)]
fn get_channel() {}

#[utoipa::path(
    post,
    path = "/channels",
    tag = "channels",
    request_body = ChannelCreateData,
    responses(
        (status = 201, description = "The created channel", body = Channel),
        (status = 400, description = "Invalid body or duplicated id", body = ErrorBody)
    )
)]
#[allow(dead_code)]
fn create_channel() {}

#[utoipa::path(
    put,
    path = "/channels/{id}",
    tag = "channels",
    params(("id" = i64, Path, description = "Channel id")),
    request_body = ChannelUpdateData,
    responses(
        (status = 200, description = "The updated channel", body = Channel),
        (status = 400, description = "Invalid body or id change", body = ErrorBody),
        (status = 404, description = "No channel has this id", body = ErrorBody)
    )
)]
#[allow(dead_code)]
fn update_channel() {}

#[utoipa::path(
    delete,
    path = "/channels/{id}",
    tag = "channels",
    params(("id" = i64, Path, description = "Channel id")),
    responses(
        (status = 200, description = "The channel was deleted", body = DeletionResponseBody),
        (status = 404, description = "No channel has this id", body = ErrorBody)
    )
)]
#[allow(dead_code)]
fn delete_channel() {}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Liveness report", body = HealthResponseBody))
)]
#[allow(dead_code)]
fn health_check() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = openapi("http://localhost:3001");
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/channels"));
        assert!(paths.contains_key("/channels/{id}"));
        assert!(paths.contains_key("/health"));
    }

    #[test]
    fn test_document_server_and_schemas() {
        let value = serde_json::to_value(openapi("https://tv.example.com")).unwrap();

        assert_eq!(value["servers"][0]["url"], "https://tv.example.com");
        let schemas = &value["components"]["schemas"];
        assert!(schemas["Channel"].is_object());
        assert!(schemas["ChannelCreateData"].is_object());
    }
}
