use super::domain::{BatchTiming, Course, CourseId};
use crate::store::RepositoryError;

/// Storage abstraction for courses and batch timings.
pub trait CatalogRepository: Send + Sync {
    /// Returns [`RepositoryError::Conflict`] when a course with the same name (ignoring case)
    /// exists.
    fn insert_course(&self, course: Course) -> Result<Course, RepositoryError>;
    fn fetch_course(&self, id: CourseId) -> Result<Option<Course>, RepositoryError>;
    fn list_courses(&self) -> Result<Vec<Course>, RepositoryError>;
    /// Returns [`RepositoryError::NotFound`] when the referenced course does not exist.
    fn insert_batch_timing(&self, timing: BatchTiming) -> Result<BatchTiming, RepositoryError>;
    fn list_batch_timings(&self) -> Result<Vec<BatchTiming>, RepositoryError>;
}
