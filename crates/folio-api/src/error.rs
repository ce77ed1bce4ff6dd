//! Folio API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::error::FolioError;
use folio_renderer::navigation::NavigationRejected;
use folio_renderer::runtime::RendererError;
use serde::Serialize;
use thiserror::Error;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is present but invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The seed project could not be read or parsed.
    #[error("seed error: {0}")]
    Seed(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around editor and renderer errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An editor operation failed.
    #[error(transparent)]
    Folio(#[from] FolioError),

    /// The renderer refused or could not take a request.
    #[error(transparent)]
    Renderer(#[from] RendererError),
}

impl From<NavigationRejected> for ApiError {
    fn from(rejected: NavigationRejected) -> Self {
        Self::Renderer(RendererError::Rejected(rejected))
    }
}

impl ApiError {
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Folio(FolioError::IndexOutOfRange { .. }) => {
                (StatusCode::NOT_FOUND, "index_out_of_range")
            }
            Self::Folio(FolioError::TransportUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "transport_unavailable")
            }
            Self::Folio(FolioError::InvalidSnapshot(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_snapshot")
            }
            Self::Folio(FolioError::Persistence(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error")
            }
            Self::Renderer(RendererError::Rejected(NavigationRejected::OutOfRange { .. })) => {
                (StatusCode::NOT_FOUND, "page_out_of_range")
            }
            Self::Renderer(RendererError::Rejected(
                NavigationRejected::TransitionInProgress { .. },
            )) => (StatusCode::CONFLICT, "transition_in_progress"),
            Self::Renderer(RendererError::Rejected(NavigationRejected::EndOfSequence)) => {
                (StatusCode::CONFLICT, "end_of_sequence")
            }
            Self::Renderer(RendererError::Stopped) => {
                (StatusCode::SERVICE_UNAVAILABLE, "renderer_stopped")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.classify();

        let body = ErrorBody {
            error: error_code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_index_out_of_range_maps_to_404() {
        assert_eq!(
            status_of(FolioError::IndexOutOfRange { index: 4, len: 2 }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_transport_unavailable_maps_to_503() {
        assert_eq!(
            status_of(FolioError::TransportUnavailable("gone".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_invalid_snapshot_maps_to_400() {
        assert_eq!(
            status_of(FolioError::InvalidSnapshot("bad frame".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_persistence_maps_to_500() {
        assert_eq!(
            status_of(FolioError::Persistence("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_navigation_rejections_map_to_404_and_409() {
        assert_eq!(
            status_of(NavigationRejected::OutOfRange { index: 9, len: 3 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(NavigationRejected::TransitionInProgress { target: 1 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(NavigationRejected::EndOfSequence),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_stopped_renderer_maps_to_503() {
        assert_eq!(
            status_of(RendererError::Stopped),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
