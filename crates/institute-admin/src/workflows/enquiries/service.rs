use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Enquiry, EnquiryDraft, EnquiryId, EnquiryPatch, FollowUpNote, MAX_FOLLOW_UPS};
use super::repository::EnquiryRepository;
use crate::store::RepositoryError;
use crate::validation::{FieldErrors, BLANK, REQUIRED};

/// Service owning enquiry writes so every path re-derives the fee balance.
pub struct EnquiryService<R> {
    repository: Arc<R>,
}

impl<R> EnquiryService<R>
where
    R: EnquiryRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate an intake form and store it with an open placement link.
    pub fn create(&self, draft: EnquiryDraft) -> Result<Enquiry, EnquiryServiceError> {
        draft.check()?;
        let enquiry = Enquiry::from_draft(draft, Utc::now());
        let stored = self.repository.insert_enquiry(enquiry)?;
        info!(
            enquiry_id = %stored.id,
            balance = stored.fees.balance_amount(),
            "enquiry created"
        );
        Ok(stored)
    }

    pub fn get(&self, id: EnquiryId) -> Result<Enquiry, EnquiryServiceError> {
        self.repository
            .fetch_enquiry(id)?
            .ok_or(EnquiryServiceError::NotFound(id))
    }

    pub fn list(&self) -> Result<Vec<Enquiry>, EnquiryServiceError> {
        Ok(self.repository.list_enquiries()?)
    }

    /// Apply a partial update. The balance is recomputed whenever a fee input changes.
    ///
    /// The patch is applied to the record as stored at write time, so fields it does not
    /// name keep whatever a concurrent writer left there.
    pub fn update(
        &self,
        id: EnquiryId,
        patch: EnquiryPatch,
    ) -> Result<Enquiry, EnquiryServiceError> {
        self.get(id)?;
        patch.check()?;

        let fees_touched = patch.fee_changes().touches_any();
        let enquiry = self.modify(id, |enquiry| {
            patch.apply(enquiry, Utc::now());
            Ok(())
        })?;

        info!(
            enquiry_id = %id,
            fees_touched,
            balance = enquiry.fees.balance_amount(),
            "enquiry updated"
        );
        Ok(enquiry)
    }

    /// Store a call note in the next free calling slot.
    pub fn record_follow_up(
        &self,
        id: EnquiryId,
        note: FollowUpNote,
    ) -> Result<Enquiry, EnquiryServiceError> {
        self.get(id)?;

        let text = match note.note.as_deref().map(str::trim) {
            None => return Err(FieldErrors::single("note", REQUIRED).into()),
            Some("") => return Err(FieldErrors::single("note", BLANK).into()),
            Some(text) => text.to_string(),
        };

        let enquiry = self.modify(id, |enquiry| {
            if enquiry.follow_ups_remaining() == 0 {
                return Err(FieldErrors::single(
                    "follow_ups",
                    format!("All {MAX_FOLLOW_UPS} follow-up calls are already recorded."),
                )
                .into());
            }
            enquiry.follow_ups.push(text);
            enquiry.updated_at = Utc::now();
            Ok(())
        })?;

        info!(
            enquiry_id = %id,
            calling = enquiry.follow_ups.len(),
            "follow-up call recorded"
        );
        Ok(enquiry)
    }

    fn modify<F>(&self, id: EnquiryId, change: F) -> Result<Enquiry, EnquiryServiceError>
    where
        F: FnOnce(&mut Enquiry) -> Result<(), EnquiryServiceError>,
    {
        self.repository
            .modify_enquiry::<EnquiryServiceError, _>(id, change)
            .map_err(|error| match error {
                EnquiryServiceError::Repository(RepositoryError::NotFound) => {
                    EnquiryServiceError::NotFound(id)
                }
                other => other,
            })
    }
}

/// Error raised by the enquiry service.
#[derive(Debug, thiserror::Error)]
pub enum EnquiryServiceError {
    #[error("Enquiry not found")]
    NotFound(EnquiryId),
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
