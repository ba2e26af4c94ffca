use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    BatchTiming, BatchTimingDraft, BatchTimingId, BatchTimingView, Course, CourseDraft, CourseId,
};
use super::repository::CatalogRepository;
use crate::store::RepositoryError;
use crate::validation::FieldErrors;

pub struct CatalogService<R> {
    repository: Arc<R>,
}

impl<R> CatalogService<R>
where
    R: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn courses(&self) -> Result<Vec<Course>, CatalogServiceError> {
        Ok(self.repository.list_courses()?)
    }

    pub fn add_course(&self, draft: CourseDraft) -> Result<Course, CatalogServiceError> {
        draft.check()?;
        let course = draft.into_course();
        let name = course.name.clone();
        match self.repository.insert_course(course) {
            Ok(stored) => {
                info!(course_id = %stored.id, name = %stored.name, "course added");
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => {
                warn!(%name, "duplicate course name rejected");
                Err(CatalogServiceError::DuplicateCourse(name))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Every batch timing with its course embedded, ordered by identifier.
    pub fn batch_timings(&self) -> Result<Vec<BatchTimingView>, CatalogServiceError> {
        let courses: HashMap<CourseId, Course> = self
            .repository
            .list_courses()?
            .into_iter()
            .map(|course| (course.id, course))
            .collect();

        let mut views = Vec::new();
        for timing in self.repository.list_batch_timings()? {
            let course = courses
                .get(&timing.course)
                .ok_or(CatalogServiceError::CourseNotFound(timing.course))?;
            views.push(BatchTimingView::new(&timing, course));
        }
        Ok(views)
    }

    pub fn add_batch_timing(
        &self,
        draft: BatchTimingDraft,
    ) -> Result<BatchTimingView, CatalogServiceError> {
        draft.check()?;
        let course_id = draft.course_id.unwrap_or(CourseId(0));
        let course = self
            .repository
            .fetch_course(course_id)?
            .ok_or(CatalogServiceError::CourseNotFound(course_id))?;

        let timing = BatchTiming {
            id: BatchTimingId(0),
            name: draft.name.unwrap_or_default().trim().to_string(),
            time_range: draft.time_range.unwrap_or_default().trim().to_string(),
            course: course.id,
        };
        let stored = match self.repository.insert_batch_timing(timing) {
            Ok(stored) => stored,
            Err(RepositoryError::NotFound) => {
                return Err(CatalogServiceError::CourseNotFound(course_id))
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            batch_timing_id = %stored.id,
            course_id = %course.id,
            time_range = %stored.time_range,
            "batch timing added"
        );
        Ok(BatchTimingView::new(&stored, &course))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("A course named '{0}' already exists")]
    DuplicateCourse(String),
    #[error("Course not found")]
    CourseNotFound(CourseId),
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;

    fn service() -> CatalogService<MemoryRecordStore> {
        CatalogService::new(Arc::new(MemoryRecordStore::default()))
    }

    fn course(name: &str) -> CourseDraft {
        CourseDraft {
            name: Some(name.to_string()),
            description: None,
        }
    }

    #[test]
    fn duplicate_course_names_conflict_regardless_of_case() {
        let service = service();
        service.add_course(course("Data Science")).expect("first course");

        let error = service
            .add_course(course("data science "))
            .expect_err("duplicate rejected");
        assert!(matches!(error, CatalogServiceError::DuplicateCourse(_)));
        assert_eq!(service.courses().expect("list").len(), 1);
    }

    #[test]
    fn batch_timing_embeds_its_course() {
        let service = service();
        let stored = service.add_course(course("Cloud Foundations")).expect("course");

        let view = service
            .add_batch_timing(BatchTimingDraft {
                name: Some("Weekday morning".to_string()),
                time_range: Some("07:00-09:00".to_string()),
                course_id: Some(stored.id),
            })
            .expect("timing stored");

        assert_eq!(view.course.name, "Cloud Foundations");
        assert_eq!(service.batch_timings().expect("list"), vec![view]);
    }

    #[test]
    fn batch_timing_for_unknown_course_is_not_found() {
        let error = service()
            .add_batch_timing(BatchTimingDraft {
                name: Some("Weekend".to_string()),
                time_range: Some("10:00-13:00".to_string()),
                course_id: Some(CourseId(42)),
            })
            .expect_err("unknown course");
        assert!(matches!(error, CatalogServiceError::CourseNotFound(CourseId(42))));
    }
}
