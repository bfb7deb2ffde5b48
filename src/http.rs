use crate::{errors::ApiError, ENCODING_FAILED_BODY};
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::IntoResponse,
    Extension,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{any::type_name, sync::Arc};

pub trait ApiResponder {
    fn http_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn unit() -> &'static str;
    fn article() -> &'static str;

    fn message(&self) -> String {
        format!("{} {} was returned", Self::article(), Self::unit())
    }
}

impl<T: ApiResponder + Serialize> ApiResponder for Vec<T> {
    #[inline]
    fn unit() -> &'static str {
        T::unit()
    }

    #[inline]
    fn article() -> &'static str {
        T::article()
    }

    fn message(&self) -> String {
        let unit = Self::unit();

        match self.len() {
            0 => format!("No {unit} was returned"),
            1 => format!("1 {unit} was returned"),
            n => format!("{n} {unit}s were returned"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppData<T>(pub Arc<T>);

impl<T> AppData<T> {
    #[inline]
    pub fn new(data: Arc<T>) -> Self {
        Self(data)
    }

    #[inline]
    pub fn extension(data: T) -> Extension<Arc<T>> {
        Extension(Arc::new(data))
    }
}

#[async_trait]
impl<T: Sync + Send + 'static, S: Send + Sync> FromRequestParts<S> for AppData<T> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let data = parts.extensions.get::<Arc<T>>().ok_or_else(|| {
            let t_name = type_name::<T>();

            tracing::error!(type_name = t_name, "Failed get AppData request extension");

            ApiError::ServicePanicked
        })?;

        Ok(Self::new(data.clone()))
    }
}

/// A successful response. Only `data` is written to the body, the status
/// code defaults to [`ApiResponder::http_code`].
#[derive(Debug)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
    pub http_code: Option<StatusCode>,
}

impl<T: Serialize> DataResponse<T> {
    #[inline]
    pub fn with_status(data: T, http_code: StatusCode) -> Self {
        Self {
            data,
            http_code: Some(http_code),
        }
    }
}

impl<T: ApiResponder + Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let http_code = self.http_code.unwrap_or_else(|| self.data.http_code());

        tracing::debug!(status = http_code.as_u16(), "{}", self.data.message());

        let tuple = match serde_json::to_vec(&self.data) {
            Ok(buf) => (
                http_code,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
                )],
                buf,
            ),
            Err(e) => {
                tracing::error!({ error = e.to_string() }, "Failed to encode response body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
                    )],
                    ENCODING_FAILED_BODY.to_vec(),
                )
            }
        };

        tuple.into_response()
    }
}

impl<T: ApiResponder + Serialize> From<T> for DataResponse<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self {
            data: value,
            http_code: None,
        }
    }
}

/// `axum::Json` with its rejections turned into [`ApiError::InvalidBody`].
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(v)) => Ok(Self(v)),
            Err(e) => Err(ApiError::InvalidBody(e.body_text())),
        }
    }
}

/// `axum::extract::Path` with its rejections turned into
/// [`ApiError::InvalidPath`], so a non-numeric id is a 400.
pub struct Path<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(v)) => Ok(Self(v)),
            Err(e) => Err(ApiError::InvalidPath(e.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[derive(Serialize)]
    struct Queued {
        job: u32,
    }

    impl ApiResponder for Queued {
        fn http_code(&self) -> StatusCode {
            StatusCode::ACCEPTED
        }

        fn unit() -> &'static str {
            "job"
        }
        fn article() -> &'static str {
            "A"
        }
    }

    #[tokio::test]
    async fn test_status_falls_back_to_responder() {
        let res = DataResponse::from(Queued { job: 7 }).into_response();

        assert_eq!(res.status(), StatusCode::ACCEPTED);
        let buf = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&buf[..], br#"{"job":7}"#);
    }

    #[test]
    fn test_explicit_status_wins() {
        let res = DataResponse::with_status(Queued { job: 7 }, StatusCode::CREATED).into_response();

        assert_eq!(res.status(), StatusCode::CREATED);
    }
}
