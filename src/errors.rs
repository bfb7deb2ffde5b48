use crate::ENCODING_FAILED_BODY;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    pub error_code: u32,
}

impl ErrorBody {
    #[inline]
    pub fn new(message: String, error_code: u32) -> Self {
        Self {
            message,
            error_code,
        }
    }
}

/// The four outcomes a failed operation can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Invalid,
    NotFound,
    Conflict,
    Unavailable,
}

impl From<ErrorKind> for StatusCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Invalid => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            // Duplicate ids are reported as a plain bad request.
            ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),
    #[error("The field \"{field}\" {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    #[error("The channel id is immutable: got {body} in the body of channel {path}")]
    ChannelIdImmutable { path: i64, body: i64 },

    #[error("The channel {0} was not found")]
    ChannelNotFound(i64),

    #[error("A channel with id {0} already exists")]
    ChannelAlreadyExists(i64),

    #[error("The channel store is unavailable")]
    StoreUnavailable,
    #[error("Something went wrong")]
    ServicePanicked,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBody(_)
            | Self::InvalidPath(_)
            | Self::InvalidField { .. }
            | Self::ChannelIdImmutable { .. } => ErrorKind::Invalid,
            Self::ChannelNotFound(_) => ErrorKind::NotFound,
            Self::ChannelAlreadyExists(_) => ErrorKind::Conflict,
            Self::StoreUnavailable | Self::ServicePanicked => ErrorKind::Unavailable,
        }
    }
}

impl From<&ApiError> for StatusCode {
    #[inline]
    fn from(err: &ApiError) -> Self {
        err.kind().into()
    }
}

impl From<&ApiError> for u32 {
    fn from(err: &ApiError) -> Self {
        let discriminator = match err {
            ApiError::InvalidBody(_) => 0,
            ApiError::InvalidPath(_) => 1,
            ApiError::InvalidField { .. } => 2,
            ApiError::ChannelIdImmutable { .. } => 3,
            ApiError::ChannelAlreadyExists(_) => 4,
            ApiError::ChannelNotFound(_) => 1,
            ApiError::StoreUnavailable => 0,
            ApiError::ServicePanicked => 1,
        };

        u32::from(StatusCode::from(err).as_u16()) * 100 + discriminator
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = StatusCode::from(&self);
        let err_body = ErrorBody::new(self.to_string(), (&self).into());

        let tuple = match serde_json::to_vec(&err_body) {
            Ok(buf) => (
                status_code,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
                )],
                buf,
            ),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
                )],
                ENCODING_FAILED_BODY.to_vec(),
            ),
        };

        tuple.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let buf = to_bytes(res.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&buf).unwrap())
    }

    #[test]
    fn test_kind_to_status_mapping() {
        assert_eq!(StatusCode::from(ErrorKind::Invalid), StatusCode::BAD_REQUEST);
        assert_eq!(StatusCode::from(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(StatusCode::from(ErrorKind::Conflict), StatusCode::BAD_REQUEST);
        assert_eq!(
            StatusCode::from(ErrorKind::Unavailable),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(u32::from(&ApiError::ChannelNotFound(3)), 40401);
        assert_eq!(u32::from(&ApiError::ChannelAlreadyExists(3)), 40004);
        assert_eq!(u32::from(&ApiError::StoreUnavailable), 50000);
        assert_eq!(
            u32::from(&ApiError::ChannelIdImmutable { path: 1, body: 2 }),
            40003
        );
    }

    #[tokio::test]
    async fn test_unavailable_body_is_generic() {
        let (status, body) = body_of(ApiError::StoreUnavailable).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "The channel store is unavailable");
        assert_eq!(body["error_code"], 50000);
    }

    #[tokio::test]
    async fn test_not_found_body_names_the_id() {
        let (status, body) = body_of(ApiError::ChannelNotFound(42)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "The channel 42 was not found");
    }
}
