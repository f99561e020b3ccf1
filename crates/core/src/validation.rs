//! Mark validation shared by the scoring engine and the record service.

use crate::error::CoreError;
use crate::types::SubjectMarks;

pub const MIN_MARK: f64 = 0.0;
pub const MAX_MARK: f64 = 100.0;

/// Validate one subject mark: present and within `[0, 100]`.
///
/// NaN fails the range check.
pub fn validate_mark(subject: &str, mark: Option<f64>) -> Result<f64, String> {
    let Some(mark) = mark else {
        return Err(format!("Mark for {subject} cannot be null"));
    };
    if !(MIN_MARK..=MAX_MARK).contains(&mark) {
        return Err(format!(
            "Marks for {subject} must be between {MIN_MARK} and {MAX_MARK}"
        ));
    }
    Ok(mark)
}

/// Validate a subject-marks mapping, prefixing failures with `context`
/// (e.g. `"Exam Midterm"` or `"Update request"`).
pub fn validate_subject_marks(marks: &SubjectMarks, context: &str) -> Result<(), CoreError> {
    if marks.is_empty() {
        return Err(CoreError::Validation(format!(
            "{context}: Subject marks are required"
        )));
    }
    for (subject, mark) in marks {
        validate_mark(subject, *mark)
            .map_err(|msg| CoreError::Validation(format!("{context}: {msg}")))?;
    }
    Ok(())
}

/// Reject roll numbers that are zero or negative.
pub fn validate_roll_number(roll_number: i32) -> Result<(), CoreError> {
    if roll_number <= 0 {
        return Err(CoreError::Validation(
            "Roll number must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
