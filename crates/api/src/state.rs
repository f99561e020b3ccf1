use std::sync::Arc;

use reportcard_core::records::RecordService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Student record service (scoring + persistence).
    pub records: Arc<RecordService>,
    /// PostgreSQL pool when the database store is in use; `None` for the
    /// in-memory store.
    pub pool: Option<reportcard_db::DbPool>,
}
