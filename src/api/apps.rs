use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::db::JsonRow;
use crate::error::AppError;

pub async fn get_all_apps(State(state): State<AppState>) -> Result<Json<Vec<JsonRow>>, AppError> {
    let apps = state
        .repo
        .list_apps()
        .await
        .map_err(AppError::database("Error fetching app details"))?;
    Ok(Json(apps))
}
