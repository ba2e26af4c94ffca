use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::checks::{check_patch, placement_from_submission};
use super::domain::{PlacementPatch, PlacementSubmission, StudentPlacement};
use super::repository::PlacementRepository;
use super::views::{IntakeState, PlacementView, PrefillView};
use crate::store::RepositoryError;
use crate::validation::FieldErrors;
use crate::workflows::enquiries::{Enquiry, EnquiryId};

/// Mediates the enquiry to placement conversion: prefill, submit once, update thereafter.
pub struct PlacementIntakeService<R> {
    repository: Arc<R>,
}

impl<R> PlacementIntakeService<R>
where
    R: PlacementRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Stored placement if one exists, otherwise form values copied from the enquiry.
    pub fn intake_state(&self, enquiry_id: EnquiryId) -> Result<IntakeState, PlacementServiceError> {
        let enquiry = self.enquiry(enquiry_id)?;
        let state = match self.repository.placement_for_enquiry(enquiry.id)? {
            Some(placement) => IntakeState::Submitted(PlacementView::from(&placement)),
            None => IntakeState::Prefill(PrefillView::from(&enquiry)),
        };
        Ok(state)
    }

    /// First submission for an enquiry.
    pub fn submit(
        &self,
        enquiry_id: EnquiryId,
        submission: PlacementSubmission,
    ) -> Result<StudentPlacement, PlacementServiceError> {
        self.submit_with(enquiry_id, || Ok(submission))
    }

    /// Partial update of an existing placement.
    pub fn update(
        &self,
        enquiry_id: EnquiryId,
        patch: PlacementPatch,
    ) -> Result<StudentPlacement, PlacementServiceError> {
        self.update_with(enquiry_id, || Ok(patch))
    }

    /// Submit a payload that is decoded only after the duplicate check, so a second
    /// submission is reported as such even when its body is malformed.
    pub fn submit_with<F>(
        &self,
        enquiry_id: EnquiryId,
        decode_submission: F,
    ) -> Result<StudentPlacement, PlacementServiceError>
    where
        F: FnOnce() -> Result<PlacementSubmission, FieldErrors>,
    {
        let enquiry = self.enquiry(enquiry_id)?;
        if self.repository.placement_for_enquiry(enquiry.id)?.is_some() {
            warn!(enquiry_id = %enquiry.id, "placement form already submitted");
            return Err(PlacementServiceError::AlreadySubmitted(enquiry.id));
        }

        let submission = decode_submission()?;
        let placement = placement_from_submission(enquiry.id, submission, Utc::now())?;

        match self.repository.submit_placement(placement) {
            Ok(stored) => {
                info!(
                    enquiry_id = %enquiry.id,
                    placement_id = %stored.id,
                    experiences = stored.experiences.len(),
                    "placement submitted; intake link closed"
                );
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => {
                warn!(enquiry_id = %enquiry.id, "concurrent placement submission rejected");
                Err(PlacementServiceError::AlreadySubmitted(enquiry.id))
            }
            Err(RepositoryError::NotFound) => {
                Err(PlacementServiceError::EnquiryNotFound(enquiry.id))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Update with a payload decoded only once the placement is known to exist.
    ///
    /// The patch lands on the placement as stored at write time, so two updates naming
    /// different fields both persist.
    pub fn update_with<F>(
        &self,
        enquiry_id: EnquiryId,
        decode_patch: F,
    ) -> Result<StudentPlacement, PlacementServiceError>
    where
        F: FnOnce() -> Result<PlacementPatch, FieldErrors>,
    {
        let enquiry = self.enquiry(enquiry_id)?;
        if self.repository.placement_for_enquiry(enquiry.id)?.is_none() {
            return Err(PlacementServiceError::PlacementNotFound(enquiry.id));
        }

        let patch = decode_patch()?;
        check_patch(&patch)?;

        let empty = patch.is_empty();
        let placement = self
            .repository
            .modify_placement::<PlacementServiceError, _>(enquiry.id, |placement| {
                patch.apply(placement, Utc::now());
                Ok(())
            })
            .map_err(|error| match error {
                PlacementServiceError::Repository(RepositoryError::NotFound) => {
                    PlacementServiceError::PlacementNotFound(enquiry.id)
                }
                other => other,
            })?;

        info!(
            enquiry_id = %enquiry.id,
            placement_id = %placement.id,
            empty,
            "placement updated"
        );
        Ok(placement)
    }

    fn enquiry(&self, enquiry_id: EnquiryId) -> Result<Enquiry, PlacementServiceError> {
        self.repository
            .fetch_enquiry(enquiry_id)?
            .ok_or(PlacementServiceError::EnquiryNotFound(enquiry_id))
    }
}

/// Error raised by the placement intake service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("Enquiry not found")]
    EnquiryNotFound(EnquiryId),
    #[error("Form already submitted!")]
    AlreadySubmitted(EnquiryId),
    #[error("No placement record found to update")]
    PlacementNotFound(EnquiryId),
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
