use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{check_not_blank, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchTimingId(pub u64);

impl fmt::Display for BatchTimingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub description: Option<String>,
}

impl Course {
    /// Names are compared case-insensitively and without surrounding whitespace.
    pub fn name_key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    pub fn view(&self) -> CourseView {
        CourseView {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// A scheduled slot for a course, such as a weekday morning batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTiming {
    pub id: BatchTimingId,
    pub name: String,
    /// Free text, for example `07:00-09:00`.
    pub time_range: String,
    pub course: CourseId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CourseDraft {
    #[validate(
        required(message = "This field is required."),
        length(max = 120, message = "Ensure this field has no more than 120 characters.")
    )]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Ensure this field has no more than 1000 characters."))]
    pub description: Option<String>,
}

impl CourseDraft {
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(derived) = self.validate() {
            errors.merge(&derived);
        }
        check_not_blank(&mut errors, "name", self.name.as_deref());
        errors.into_result()
    }

    /// Unsaved course; the store assigns the identifier.
    pub fn into_course(self) -> Course {
        Course {
            id: CourseId(0),
            name: self.name.unwrap_or_default().trim().to_string(),
            description: self
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct BatchTimingDraft {
    #[validate(
        required(message = "This field is required."),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub time_range: Option<String>,
    #[validate(required(message = "This field is required."))]
    pub course_id: Option<CourseId>,
}

impl BatchTimingDraft {
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(derived) = self.validate() {
            errors.merge(&derived);
        }
        check_not_blank(&mut errors, "name", self.name.as_deref());
        check_not_blank(&mut errors, "time_range", self.time_range.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseView {
    pub id: CourseId,
    pub name: String,
    pub description: Option<String>,
}

/// Batch timing with its course embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchTimingView {
    pub id: BatchTimingId,
    pub name: String,
    pub time_range: String,
    pub course: CourseView,
}

impl BatchTimingView {
    pub fn new(timing: &BatchTiming, course: &Course) -> Self {
        Self {
            id: timing.id,
            name: timing.name.clone(),
            time_range: timing.time_range.clone(),
            course: course.view(),
        }
    }
}
