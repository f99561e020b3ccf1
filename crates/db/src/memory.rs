//! In-process [`StudentStore`] used when no `DATABASE_URL` is configured
//! and by the HTTP integration tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reportcard_core::records::{StoreError, StudentStore};
use reportcard_core::types::Student;
use tokio::sync::RwLock;

/// Students keyed by identifier. The roll number check and the insert
/// happen under one write lock, so uniqueness holds under concurrent saves.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    students: RwLock<BTreeMap<String, Student>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, StoreError> {
        Ok(self.students.read().await.get(id).cloned())
    }

    async fn find_by_roll_number(&self, roll_number: i32) -> Result<Option<Student>, StoreError> {
        let students = self.students.read().await;
        Ok(students
            .values()
            .find(|s| s.roll_number == roll_number)
            .cloned())
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.students.read().await.contains_key(id))
    }

    async fn save(&self, mut student: Student) -> Result<Student, StoreError> {
        let mut students = self.students.write().await;

        let taken = students
            .values()
            .any(|s| s.roll_number == student.roll_number && s.id != student.id);
        if taken {
            tracing::warn!(roll_number = student.roll_number, "Roll number already exists");
            return Err(StoreError::DuplicateRollNumber(student.roll_number));
        }

        let id = student
            .id
            .get_or_insert_with(|| uuid::Uuid::now_v7().to_string())
            .clone();
        students.insert(id, student.clone());
        Ok(student)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.students.write().await.remove(id);
        Ok(())
    }
}
