//! Repository for the `students` table.

use async_trait::async_trait;
use reportcard_core::records::{StoreError, StudentStore};
use reportcard_core::types::Student;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::student::StudentRow;

/// Column list for the `students` table.
const COLUMNS: &str = "id, roll_number, name, terms, created_at, updated_at";

/// Unique constraint guarding roll numbers (see the create_students migration).
pub const ROLL_NUMBER_CONSTRAINT: &str = "uq_students_roll_number";

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Provides CRUD operations for student records.
pub struct StudentRepo;

impl StudentRepo {
    /// Find a student by its storage identifier.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<StudentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, StudentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a student by roll number.
    pub async fn find_by_roll_number(
        pool: &PgPool,
        roll_number: i32,
    ) -> Result<Option<StudentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE roll_number = $1");
        sqlx::query_as::<_, StudentRow>(&query)
            .bind(roll_number)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Insert or replace the row keyed by `id`.
    ///
    /// A roll number owned by another row violates
    /// [`ROLL_NUMBER_CONSTRAINT`] and surfaces as a database error.
    pub async fn upsert(
        pool: &PgPool,
        id: &str,
        student: &Student,
    ) -> Result<StudentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (id, roll_number, name, terms) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                roll_number = EXCLUDED.roll_number, \
                name = EXCLUDED.name, \
                terms = EXCLUDED.terms \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudentRow>(&query)
            .bind(id)
            .bind(student.roll_number)
            .bind(&student.name)
            .bind(Json(&student.terms))
            .fetch_one(pool)
            .await
    }

    /// Delete a student. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// StudentStore adapter
// ---------------------------------------------------------------------------

/// [`StudentStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, StoreError> {
        let row = StudentRepo::find_by_id(&self.pool, id)
            .await
            .map_err(backend)?;
        Ok(row.map(Student::from))
    }

    async fn find_by_roll_number(&self, roll_number: i32) -> Result<Option<Student>, StoreError> {
        let row = StudentRepo::find_by_roll_number(&self.pool, roll_number)
            .await
            .map_err(backend)?;
        Ok(row.map(Student::from))
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        StudentRepo::exists(&self.pool, id).await.map_err(backend)
    }

    async fn save(&self, student: Student) -> Result<Student, StoreError> {
        let id = student
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());

        let row = StudentRepo::upsert(&self.pool, &id, &student)
            .await
            .map_err(|err| classify_save_error(err, student.roll_number))?;
        Ok(Student::from(row))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let deleted = StudentRepo::delete(&self.pool, id).await.map_err(backend)?;
        if !deleted {
            tracing::debug!(id, "Delete matched no student row");
        }
        Ok(())
    }
}

/// Wrap any sqlx error as a backend failure, keeping its message.
fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

/// Map a roll-number unique violation to [`StoreError::DuplicateRollNumber`].
fn classify_save_error(err: sqlx::Error, roll_number: i32) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
            && db_err.constraint() == Some(ROLL_NUMBER_CONSTRAINT)
        {
            tracing::warn!(roll_number, "Roll number already exists");
            return StoreError::DuplicateRollNumber(roll_number);
        }
    }
    backend(err)
}
