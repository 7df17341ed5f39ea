use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use thiserror::Error;

/// Response envelope shared by every endpoint: `{message, success, ...payload}`.
/// Failures are distinguished by `success:false`, not by status code.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub message: String,
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Debug, Serialize)]
pub struct Empty {}

pub fn ok<T: Serialize>(message: impl Into<String>, payload: T) -> Json<Envelope<T>> {
    Json(Envelope {
        message: message.into(),
        success: true,
        payload,
    })
}

pub fn ok_message(message: impl Into<String>) -> Json<Envelope<Empty>> {
    ok(message, Empty {})
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Domain rejection surfaced to the client as-is.
    #[error("{0}")]
    Fail(String),
    #[error("Please login to access this resource")]
    Unauthenticated,
    #[error("you are not authorized to access this resource")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            tracing::error!(error = %err, "request failed");
        }
        let body = Json(Envelope {
            message: self.to_string(),
            success: false,
            payload: Empty {},
        });
        (StatusCode::OK, body).into_response()
    }
}

/// Parses a path/query id, converting garbage ids into the same not-found
/// failure the caller would produce for a missing document.
pub fn parse_id(value: &str, not_found: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::fail(not_found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_flattens_payload() {
        #[derive(Serialize)]
        struct Payload {
            count: u32,
        }
        let body = serde_json::to_value(Envelope {
            message: "done".into(),
            success: true,
            payload: Payload { count: 3 },
        })
        .unwrap();
        assert_eq!(body["message"], "done");
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 3);
    }

    #[test]
    fn empty_payload_adds_no_fields() {
        let body = serde_json::to_value(Envelope {
            message: "done".into(),
            success: true,
            payload: Empty {},
        })
        .unwrap();
        assert_eq!(body.as_object().unwrap().len(), 2);
    }

    #[test]
    fn failure_envelope_keeps_domain_message() {
        let err = ApiError::fail("Product already present");
        assert_eq!(err.to_string(), "Product already present");
    }

    #[test]
    fn parse_id_maps_garbage_to_not_found() {
        let err = parse_id("not-an-id", "Order not found").unwrap_err();
        assert_eq!(err.to_string(), "Order not found");
        assert!(parse_id("65a1b2c3d4e5f6a7b8c9d0e1", "Order not found").is_ok());
    }
}
