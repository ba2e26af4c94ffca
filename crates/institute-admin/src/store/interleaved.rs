use std::sync::Mutex;

use super::{MemoryRecordStore, RepositoryError};
use crate::workflows::enquiries::{Enquiry, EnquiryId, EnquiryRepository};
use crate::workflows::placement::{NewPlacement, PlacementRepository, StudentPlacement};

type Write = Box<dyn FnOnce(&MemoryRecordStore) + Send>;

/// Test store that runs a queued write against the shared tables right after the next read,
/// the way a second request lands between a service's read and its own write.
#[derive(Default)]
pub(crate) struct InterleavedStore {
    inner: MemoryRecordStore,
    pending: Mutex<Vec<Write>>,
}

impl InterleavedStore {
    pub(crate) fn after_next_read<F>(&self, write: F)
    where
        F: FnOnce(&MemoryRecordStore) + Send + 'static,
    {
        self.pending.lock().expect("pending writes").push(Box::new(write));
    }

    fn run_pending(&self) {
        let writes: Vec<Write> = self.pending.lock().expect("pending writes").drain(..).collect();
        for write in writes {
            write(&self.inner);
        }
    }
}

impl EnquiryRepository for InterleavedStore {
    fn insert_enquiry(&self, enquiry: Enquiry) -> Result<Enquiry, RepositoryError> {
        self.inner.insert_enquiry(enquiry)
    }

    fn fetch_enquiry(&self, id: EnquiryId) -> Result<Option<Enquiry>, RepositoryError> {
        let found = self.inner.fetch_enquiry(id)?;
        self.run_pending();
        Ok(found)
    }

    fn list_enquiries(&self) -> Result<Vec<Enquiry>, RepositoryError> {
        self.inner.list_enquiries()
    }

    fn modify_enquiry<E, F>(&self, id: EnquiryId, change: F) -> Result<Enquiry, E>
    where
        F: FnOnce(&mut Enquiry) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        self.inner.modify_enquiry(id, change)
    }
}

impl PlacementRepository for InterleavedStore {
    fn placement_for_enquiry(
        &self,
        enquiry: EnquiryId,
    ) -> Result<Option<StudentPlacement>, RepositoryError> {
        let found = self.inner.placement_for_enquiry(enquiry)?;
        self.run_pending();
        Ok(found)
    }

    fn submit_placement(
        &self,
        placement: NewPlacement,
    ) -> Result<StudentPlacement, RepositoryError> {
        self.inner.submit_placement(placement)
    }

    fn modify_placement<E, F>(&self, enquiry: EnquiryId, change: F) -> Result<StudentPlacement, E>
    where
        F: FnOnce(&mut StudentPlacement) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        self.inner.modify_placement(enquiry, change)
    }
}
