//! Placement intake: converts an enquiry into a student placement application with its
//! employment history, once.

mod checks;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Experience, ExperienceId, ExperienceSubmission, NewExperience, NewPlacement, PlacementId,
    PlacementPatch, PlacementSubmission, StudentPlacement,
};
pub use repository::PlacementRepository;
pub use router::{placement_router, EnquiryQuery};
pub use service::{PlacementIntakeService, PlacementServiceError};
pub use views::{ExperienceView, IntakeState, PlacementView, PrefillView};
