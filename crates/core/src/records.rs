//! Record service: runs the scoring engine against persisted students.
//!
//! Storage is reached only through [`StudentStore`]. Roll number uniqueness
//! is guaranteed by the store's `save`; the service's own existence check
//! only produces the friendlier early error.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::scoring::ScoringEngine;
use crate::types::{MarkUpdate, ReportCard, Student};
use crate::validation::{validate_roll_number, validate_subject_marks};

// ---------------------------------------------------------------------------
// Persistence contract
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another record already owns this roll number.
    #[error("Roll number {0} already exists")]
    DuplicateRollNumber(i32),

    /// Failure inside the storage backend, with its original message.
    #[error("{0}")]
    Backend(String),
}

/// Document store for student records, keyed by storage identifier.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, StoreError>;

    async fn find_by_roll_number(&self, roll_number: i32) -> Result<Option<Student>, StoreError>;

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError>;

    /// Upsert keyed by `student.id`, assigning an identifier when it is
    /// `None`. Must fail with [`StoreError::DuplicateRollNumber`] when the
    /// roll number belongs to a different identifier.
    async fn save(&self, student: Student) -> Result<Student, StoreError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateRollNumber(_) => {
                CoreError::Validation(DUPLICATE_ROLL_NUMBER.to_string())
            }
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

const DUPLICATE_ROLL_NUMBER: &str = "Roll number already exists";

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn StudentStore>,
    engine: ScoringEngine,
}

impl RecordService {
    pub fn new(store: Arc<dyn StudentStore>, engine: ScoringEngine) -> Self {
        Self { store, engine }
    }

    /// Score and persist a new student. Rejects duplicate roll numbers
    /// without saving anything.
    ///
    /// Any client-supplied `id` is discarded; the store assigns a fresh one,
    /// so a create can never overwrite an existing record.
    pub async fn create(&self, mut student: Student) -> Result<ReportCard, CoreError> {
        validate_roll_number(student.roll_number)?;
        student.id = None;

        if self
            .store
            .find_by_roll_number(student.roll_number)
            .await?
            .is_some()
        {
            tracing::warn!(roll_number = student.roll_number, "Roll number already exists");
            return Err(CoreError::Validation(DUPLICATE_ROLL_NUMBER.to_string()));
        }

        let card = self.engine.score_student(&student)?;
        let saved = self.store.save(card.student).await?;

        tracing::info!(
            roll_number = saved.roll_number,
            id = saved.id.as_deref().unwrap_or_default(),
            "Report card generated"
        );
        Ok(ReportCard {
            student: saved,
            final_score: card.final_score,
        })
    }

    pub async fn get_by_roll_number(&self, roll_number: i32) -> Result<Option<Student>, CoreError> {
        if let Err(err) = validate_roll_number(roll_number) {
            tracing::warn!(roll_number, "Invalid roll number provided");
            return Err(err);
        }
        let student = self.store.find_by_roll_number(roll_number).await?;
        if student.is_some() {
            tracing::info!(roll_number, "Student found");
        } else {
            tracing::info!(roll_number, "No student found");
        }
        Ok(student)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Student>, CoreError> {
        require_id(id)?;
        Ok(self.store.find_by_id(id).await?)
    }

    /// Final score of an already stored student, re-derived from its terms.
    pub async fn final_score_for(&self, roll_number: i32) -> Result<f64, CoreError> {
        let student = self
            .get_by_roll_number(roll_number)
            .await?
            .ok_or_else(|| student_not_found(roll_number))?;
        self.engine.final_score(&student)
    }

    /// Merge new marks into one exam, recompute its term and persist.
    ///
    /// Every request field is validated before the student is looked up.
    pub async fn update_marks(
        &self,
        roll_number: i32,
        update: MarkUpdate,
    ) -> Result<Student, CoreError> {
        validate_roll_number(roll_number)?;
        if update.term_name.is_empty() {
            return Err(CoreError::Validation("Term name is required".to_string()));
        }
        if update.exam_name.is_empty() {
            return Err(CoreError::Validation("Exam name is required".to_string()));
        }
        validate_subject_marks(&update.subject_marks, "Update request")?;

        let student = self
            .store
            .find_by_roll_number(roll_number)
            .await?
            .ok_or_else(|| {
                tracing::warn!(roll_number, "Student not found");
                student_not_found(roll_number)
            })?;

        let updated = self.engine.apply_mark_update(&student, &update)?;
        let saved = self.store.save(updated).await?;

        tracing::info!(roll_number, "Marks updated");
        Ok(saved)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), CoreError> {
        require_id(id)?;
        if !self.store.exists_by_id(id).await? {
            tracing::warn!(id, "Student not found for deletion");
            return Err(CoreError::NotFound {
                entity: "Student",
                key: format!("id {id}"),
            });
        }
        self.store.delete_by_id(id).await?;
        tracing::info!(id, "Student deleted");
        Ok(())
    }
}

fn require_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::Validation("ID is required".to_string()));
    }
    Ok(())
}

fn student_not_found(roll_number: i32) -> CoreError {
    CoreError::NotFound {
        entity: "Student",
        key: format!("roll number {roll_number}"),
    }
}
