use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::extract::LenientJson;
use crate::api::AppState;
use crate::db::JsonRow;
use crate::domain::{ExpertSubmission, UpsertOutcome};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Experts joined with their account's email; orphans are omitted.
pub async fn get_all_experts(
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonRow>>, AppError> {
    let experts = state
        .repo
        .list_experts()
        .await
        .map_err(AppError::database("Error fetching expert details"))?;
    Ok(Json(experts))
}

/// Update the expert for `(account_id, app_id)` if present, else insert it.
///
/// 200 on update, 201 on insert. Neither echoes the row back.
pub async fn create_expert(
    State(state): State<AppState>,
    LenientJson(submission): LenientJson<ExpertSubmission>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let outcome = state
        .repo
        .upsert_expert(&submission)
        .await
        .map_err(AppError::database("Error processing expert data"))?;

    match outcome {
        UpsertOutcome::Created => {
            tracing::info!(account_id = %submission.account_id, app_id = %submission.app_id, "Expert created");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse {
                    message: "Expert created successfully",
                }),
            ))
        }
        UpsertOutcome::Updated { rows } => {
            tracing::info!(account_id = %submission.account_id, app_id = %submission.app_id, rows, "Expert updated");
            Ok((
                StatusCode::OK,
                Json(MessageResponse {
                    message: "Expert updated successfully",
                }),
            ))
        }
    }
}
