#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `key` names the lookup, e.g. `id 0190c3...` or `roll number 7`.
    #[error("Entity not found: {entity} with {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
