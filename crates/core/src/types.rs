//! Student record tree: a student owns its terms, a term owns its exams.
//!
//! Field names serialize in camelCase to match the stored document shape
//! (`rollNumber`, `termName`, `subjectMarks`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Storage identifier assigned by the persistence layer.
pub type StudentId = String;

/// Subject name -> mark. A `None` mark is a null sent by the client and is
/// rejected by validation before any score is computed.
pub type SubjectMarks = BTreeMap<String, Option<f64>>;

/// Key under which an exam's science score is stored in `weighted_scores`.
pub const SCIENCE_KEY: &str = "Science";

pub const PHYSICS: &str = "Physics";
pub const CHEMISTRY: &str = "Chemistry";
pub const BIOLOGY: &str = "Biology";

/// Number of exams every term must contain.
pub const EXAMS_PER_TERM: usize = 3;

// ---------------------------------------------------------------------------
// Record tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StudentId>,
    #[serde(default)]
    pub roll_number: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    #[serde(default)]
    pub term_name: String,
    #[serde(default)]
    pub exams: Vec<Exam>,
    /// Derived; recomputed whenever any of the term's exams change.
    #[serde(default)]
    pub term_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    #[serde(default)]
    pub exam_name: String,
    #[serde(default)]
    pub subject_marks: SubjectMarks,
    /// Derived; weighted-category name -> weighted score.
    #[serde(default)]
    pub weighted_scores: BTreeMap<String, f64>,
}

impl Student {
    /// Position of the first term whose name matches exactly.
    pub fn term_index(&self, term_name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.term_name == term_name)
    }
}

impl Term {
    /// Position of the first exam whose name matches exactly.
    pub fn exam_index(&self, exam_name: &str) -> Option<usize> {
        self.exams.iter().position(|e| e.exam_name == exam_name)
    }
}

impl Exam {
    /// The stored science score, if the exam has been scored.
    pub fn science_score(&self) -> Option<f64> {
        self.weighted_scores.get(SCIENCE_KEY).copied()
    }
}

// ---------------------------------------------------------------------------
// Operation inputs / outputs
// ---------------------------------------------------------------------------

/// Partial mark update for one exam of one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkUpdate {
    #[serde(default)]
    pub term_name: String,
    #[serde(default)]
    pub exam_name: String,
    #[serde(default)]
    pub subject_marks: SubjectMarks,
}

/// A fully scored student snapshot together with its aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCard {
    pub student: Student,
    pub final_score: f64,
}
