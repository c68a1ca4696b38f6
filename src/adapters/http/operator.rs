//! Operator identity extractor.
//!
//! Authentication happens upstream; the operator id arrives in the
//! `x-operator-id` header and becomes the `CommandMetadata` of a command.
//! An `x-request-id` header, when present, is used as correlation id.

use axum::{
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{CommandMetadata, UserId};

use super::planning::ErrorResponse;

pub const OPERATOR_HEADER: &str = "x-operator-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Command metadata built from request headers.
#[derive(Debug, Clone)]
pub struct Operator(pub CommandMetadata);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = OperatorRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let operator = header(parts, OPERATOR_HEADER).ok_or(OperatorRejection::Missing)?;
        let user_id = UserId::new(operator).map_err(|_| OperatorRejection::Invalid)?;

        let mut metadata = CommandMetadata::new(user_id).with_source("http");
        if let Some(request_id) = header(parts, REQUEST_ID_HEADER) {
            metadata = metadata.with_correlation_id(request_id);
        }

        Ok(Operator(metadata))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorRejection {
    Missing,
    Invalid,
}

impl IntoResponse for OperatorRejection {
    fn into_response(self) -> Response {
        let message = match self {
            OperatorRejection::Missing => "Missing x-operator-id header",
            OperatorRejection::Invalid => "Invalid x-operator-id header",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("MISSING_OPERATOR", message)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn extract(headers: &[(&str, &str)]) -> Result<Operator, OperatorRejection> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Operator::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn builds_metadata_from_headers() {
        let Operator(metadata) = extract(&[(OPERATOR_HEADER, "op-7"), (REQUEST_ID_HEADER, "req-42")])
            .await
            .unwrap();

        assert_eq!(metadata.user_id.as_str(), "op-7");
        assert_eq!(metadata.correlation_id(), "req-42");
        assert_eq!(metadata.source(), Some("http"));
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        assert_eq!(extract(&[]).await.unwrap_err(), OperatorRejection::Missing);
        assert_eq!(
            extract(&[(OPERATOR_HEADER, "  ")]).await.unwrap_err(),
            OperatorRejection::Missing
        );
    }

    #[test]
    fn rejection_is_unauthorized() {
        assert_eq!(
            OperatorRejection::Missing.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
