use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors surfaced by route handlers.
///
/// The client only ever sees the fixed `message`; the underlying cause is
/// logged server-side.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}: {source}")]
    Database {
        message: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    /// Adapter for `map_err` that tags a store error with its user-facing text.
    pub fn database(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |source| AppError::Database { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database { message, source } => {
                tracing::error!(error = %source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_error_hides_cause() {
        let err = AppError::database("Error fetching app details")(sqlx::Error::PoolTimedOut);
        assert!(err.to_string().starts_with("Error fetching app details: "));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Error fetching app details");
    }
}
