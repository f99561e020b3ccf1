pub mod health;
pub mod reportcard;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reportcard/generate                       generate (POST)
/// /reportcard/{id}                           get, delete
/// /reportcard/roll/{roll_number}             get
/// /reportcard/roll/{roll_number}/score       final score (GET)
/// /reportcard/roll/{roll_number}/marks       update marks (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/reportcard", reportcard::router())
}
