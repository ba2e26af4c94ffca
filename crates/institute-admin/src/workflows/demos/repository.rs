use chrono::{DateTime, Utc};

use super::domain::{DemoEntry, DemoId};
use crate::store::RepositoryError;
use crate::workflows::enquiries::{EnquiryId, EnquiryRepository};

/// Storage abstraction for the demo class list.
pub trait DemoRepository: EnquiryRepository {
    /// Persist a new entry. A linked enquiry that does not exist is [`RepositoryError::NotFound`].
    fn insert_demo(&self, entry: DemoEntry) -> Result<DemoEntry, RepositoryError>;
    fn list_demos(&self) -> Result<Vec<DemoEntry>, RepositoryError>;

    /// Run `change` against the stored entry under one lock and persist the result.
    fn modify_demo<E, F>(&self, id: DemoId, change: F) -> Result<DemoEntry, E>
    where
        F: FnOnce(&mut DemoEntry) -> Result<(), E>,
        E: From<RepositoryError>;

    /// Flag the enquiry as moved and add its demo entry as one step.
    ///
    /// Returns [`RepositoryError::Conflict`] when the enquiry was already moved and
    /// [`RepositoryError::NotFound`] when it does not exist; nothing is written in either case.
    fn move_enquiry_to_demo(
        &self,
        enquiry: EnquiryId,
        now: DateTime<Utc>,
    ) -> Result<DemoEntry, RepositoryError>;
}
