use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::extract::LenientJson;
use crate::api::AppState;
use crate::db::JsonRow;
use crate::domain::Credentials;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub success: bool,
    pub message: &'static str,
    /// The full stored row, password column included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<JsonRow>,
}

/// Plaintext credential check.
///
/// A mismatch is still a 200; callers must look at `success`.
pub async fn sign_in(
    State(state): State<AppState>,
    LenientJson(credentials): LenientJson<Credentials>,
) -> Result<Json<SignInResponse>, AppError> {
    let account = state
        .repo
        .find_account_by_credentials(&credentials)
        .await
        .map_err(AppError::database("Error during sign-in"))?;

    let response = match account {
        Some(account) => SignInResponse {
            success: true,
            message: "Sign-in successful",
            account: Some(account),
        },
        None => SignInResponse {
            success: false,
            message: "Invalid email or password",
            account: None,
        },
    };
    Ok(Json(response))
}
