use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{DemoDraft, DemoEntry, DemoId, DemoStatusUpdate, DemoView};
use super::repository::DemoRepository;
use crate::store::RepositoryError;
use crate::validation::FieldErrors;
use crate::workflows::enquiries::{Enquiry, EnquiryId};

pub struct DemoService<R> {
    repository: Arc<R>,
}

impl<R> DemoService<R>
where
    R: DemoRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Book a demo directly, optionally linked to an existing enquiry.
    pub fn create(&self, draft: DemoDraft) -> Result<DemoView, DemoServiceError> {
        draft.check()?;
        let linked = match draft.student_enquiry_id {
            Some(id) => Some(self.enquiry(id)?),
            None => None,
        };

        let entry = draft.into_entry(Utc::now());
        let stored = match (self.repository.insert_demo(entry), linked.as_ref()) {
            (Ok(stored), _) => stored,
            (Err(RepositoryError::NotFound), Some(enquiry)) => {
                return Err(DemoServiceError::EnquiryNotFound(enquiry.id))
            }
            (Err(other), _) => return Err(other.into()),
        };

        info!(demo_id = %stored.id, status = %stored.status, "demo booked");
        Ok(stored.view(linked.as_ref()))
    }

    /// Every demo entry ordered by identifier, with linked enquiries embedded.
    pub fn list(&self) -> Result<Vec<DemoView>, DemoServiceError> {
        let enquiries: HashMap<EnquiryId, Enquiry> = self
            .repository
            .list_enquiries()?
            .into_iter()
            .map(|enquiry| (enquiry.id, enquiry))
            .collect();

        Ok(self
            .repository
            .list_demos()?
            .iter()
            .map(|entry| entry.view(entry.enquiry.and_then(|id| enquiries.get(&id))))
            .collect())
    }

    pub fn update_status(
        &self,
        id: DemoId,
        update: DemoStatusUpdate,
    ) -> Result<DemoView, DemoServiceError> {
        let status = update.status()?;
        let entry = self
            .repository
            .modify_demo::<DemoServiceError, _>(id, |entry| {
                entry.status = status;
                entry.updated_at = Utc::now();
                Ok(())
            })
            .map_err(|error| match error {
                DemoServiceError::Repository(RepositoryError::NotFound) => {
                    DemoServiceError::DemoNotFound(id)
                }
                other => other,
            })?;

        info!(demo_id = %id, %status, "demo status changed");
        self.view(&entry)
    }

    /// Hand an enquiry over to the demo list. Each enquiry can be moved once.
    pub fn move_enquiry(&self, enquiry_id: EnquiryId) -> Result<DemoView, DemoServiceError> {
        let entry = match self.repository.move_enquiry_to_demo(enquiry_id, Utc::now()) {
            Ok(entry) => entry,
            Err(RepositoryError::Conflict) => {
                warn!(enquiry_id = %enquiry_id, "enquiry already moved to demo");
                return Err(DemoServiceError::AlreadyMoved(enquiry_id));
            }
            Err(RepositoryError::NotFound) => {
                return Err(DemoServiceError::EnquiryNotFound(enquiry_id))
            }
            Err(other) => return Err(other.into()),
        };

        info!(enquiry_id = %enquiry_id, demo_id = %entry.id, "enquiry moved to demo");
        self.view(&entry)
    }

    fn view(&self, entry: &DemoEntry) -> Result<DemoView, DemoServiceError> {
        let enquiry = match entry.enquiry {
            Some(id) => self.repository.fetch_enquiry(id)?,
            None => None,
        };
        Ok(entry.view(enquiry.as_ref()))
    }

    fn enquiry(&self, id: EnquiryId) -> Result<Enquiry, DemoServiceError> {
        self.repository
            .fetch_enquiry(id)?
            .ok_or(DemoServiceError::EnquiryNotFound(id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DemoServiceError {
    #[error("Enquiry not found")]
    EnquiryNotFound(EnquiryId),
    #[error("Demo entry not found")]
    DemoNotFound(DemoId),
    #[error("Enquiry already moved to demo")]
    AlreadyMoved(EnquiryId),
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
