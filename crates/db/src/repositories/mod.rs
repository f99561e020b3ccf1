pub mod student_repo;

pub use student_repo::{PgStudentStore, StudentRepo};
