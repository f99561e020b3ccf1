//! Route definitions for the `/reportcard` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::reportcard;
use crate::state::AppState;

/// Routes mounted at `/reportcard`.
///
/// ```text
/// POST   /generate                    -> generate
/// GET    /{id}                        -> get_by_id
/// DELETE /{id}                        -> delete
/// GET    /roll/{roll_number}          -> get_by_roll_number
/// GET    /roll/{roll_number}/score    -> get_final_score
/// PUT    /roll/{roll_number}/marks    -> update_marks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(reportcard::generate))
        .route(
            "/{id}",
            get(reportcard::get_by_id).delete(reportcard::delete),
        )
        .route("/roll/{roll_number}", get(reportcard::get_by_roll_number))
        .route(
            "/roll/{roll_number}/score",
            get(reportcard::get_final_score),
        )
        .route("/roll/{roll_number}/marks", put(reportcard::update_marks))
}
