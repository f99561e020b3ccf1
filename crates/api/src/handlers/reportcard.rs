//! Handlers for the `/reportcard` resource.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reportcard_core::error::CoreError;
use reportcard_core::types::{MarkUpdate, Student};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/reportcard/generate
///
/// Score and store a new student record; responds with the final score.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<Student>, JsonRejection>,
) -> AppResult<Json<DataResponse<f64>>> {
    let Json(student) = payload.map_err(bad_body)?;
    tracing::info!(roll_number = student.roll_number, "Generating report card");
    let card = state.records.create(student).await?;
    Ok(Json(DataResponse {
        data: card.final_score,
    }))
}

/// GET /api/v1/reportcard/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Student>>> {
    let student = state
        .records
        .get_by_id(&id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Student",
                key: format!("id {id}"),
            })
        })?;
    Ok(Json(DataResponse { data: student }))
}

/// GET /api/v1/reportcard/roll/{roll_number}
pub async fn get_by_roll_number(
    State(state): State<AppState>,
    roll_number: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<DataResponse<Student>>> {
    let Path(roll_number) = roll_number.map_err(bad_path)?;
    let student = state
        .records
        .get_by_roll_number(roll_number)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Student",
                key: format!("roll number {roll_number}"),
            })
        })?;
    Ok(Json(DataResponse { data: student }))
}

/// GET /api/v1/reportcard/roll/{roll_number}/score
///
/// Final score of a stored record, re-derived from its terms.
pub async fn get_final_score(
    State(state): State<AppState>,
    roll_number: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<DataResponse<f64>>> {
    let Path(roll_number) = roll_number.map_err(bad_path)?;
    let score = state.records.final_score_for(roll_number).await?;
    Ok(Json(DataResponse { data: score }))
}

/// PUT /api/v1/reportcard/roll/{roll_number}/marks
///
/// Merge subject marks into one exam and return the updated record.
pub async fn update_marks(
    State(state): State<AppState>,
    roll_number: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MarkUpdate>, JsonRejection>,
) -> AppResult<Json<DataResponse<Student>>> {
    let Path(roll_number) = roll_number.map_err(bad_path)?;
    let Json(update) = payload.map_err(bad_body)?;
    let student = state.records.update_marks(roll_number, update).await?;
    Ok(Json(DataResponse { data: student }))
}

/// DELETE /api/v1/reportcard/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.records.delete_by_id(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Malformed or mistyped JSON bodies become `BAD_REQUEST` in the standard
/// error envelope.
fn bad_body(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

/// Unparseable path segments (e.g. a non-numeric roll number) likewise.
fn bad_path(rejection: PathRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
