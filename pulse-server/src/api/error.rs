//! HTTP error responses
//!
//! Maps the shared error taxonomy onto HTTP statuses: authoring and
//! submission validation failures are client errors, duplicate submission
//! is a conflict, and everything ambient is a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pulse_common::Error;
use serde_json::json;
use tracing::error;

/// Wrapper turning `pulse_common::Error` into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::DuplicateSubmission => StatusCode::CONFLICT,
            Error::UnknownReference { .. }
            | Error::ForwardReference { .. }
            | Error::DuplicateQuestionCode(_)
            | Error::UnknownQuestion(_)
            | Error::MissingRequiredAnswer { .. }
            | Error::AnsweredHiddenQuestion { .. }
            | Error::CampaignNotActive(_)
            | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Io(_) | Error::Json(_) | Error::Config(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self.0);
        }

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: Error) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(Error::NotFound("campaign x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(Error::DuplicateSubmission), StatusCode::CONFLICT);
        assert_eq!(
            status_of(Error::Unauthorized("no identity".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(Error::MissingRequiredAnswer { question: "Q".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::ForwardReference { question: "Q".into(), code: "q9".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::CampaignNotActive("closed".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
