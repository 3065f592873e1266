use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::db::JsonRow;
use crate::error::AppError;

pub async fn get_all_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonRow>>, AppError> {
    let categories = state
        .repo
        .list_categories()
        .await
        .map_err(AppError::database("Error fetching category details"))?;
    Ok(Json(categories))
}
