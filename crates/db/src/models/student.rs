//! Row type for the `students` table.

use reportcard_core::types::{Student, Term};
use sqlx::types::Json;
use sqlx::FromRow;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: String,
    pub roll_number: i32,
    pub name: String,
    pub terms: Json<Vec<Term>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: Some(row.id),
            roll_number: row.roll_number,
            name: row.name,
            terms: row.terms.0,
        }
    }
}
