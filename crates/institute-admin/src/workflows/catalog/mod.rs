//! Course and batch timing reference data.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    BatchTiming, BatchTimingDraft, BatchTimingId, BatchTimingView, Course, CourseDraft, CourseId,
    CourseView,
};
pub use repository::CatalogRepository;
pub use router::catalog_router;
pub use service::{CatalogService, CatalogServiceError};
