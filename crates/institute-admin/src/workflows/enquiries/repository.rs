use super::domain::{Enquiry, EnquiryId};
use crate::store::RepositoryError;

/// Storage abstraction for enquiry records.
pub trait EnquiryRepository: Send + Sync {
    /// Persist a new enquiry. The store assigns the identifier and returns the stored record.
    fn insert_enquiry(&self, enquiry: Enquiry) -> Result<Enquiry, RepositoryError>;
    fn fetch_enquiry(&self, id: EnquiryId) -> Result<Option<Enquiry>, RepositoryError>;
    /// All enquiries ordered by identifier.
    fn list_enquiries(&self) -> Result<Vec<Enquiry>, RepositoryError>;

    /// Run `change` against the stored enquiry and persist the result, reading and writing
    /// under one lock so concurrent writers cannot overwrite each other's fields.
    ///
    /// Nothing is written when `change` fails. A missing enquiry is
    /// [`RepositoryError::NotFound`].
    fn modify_enquiry<E, F>(&self, id: EnquiryId, change: F) -> Result<Enquiry, E>
    where
        F: FnOnce(&mut Enquiry) -> Result<(), E>,
        E: From<RepositoryError>;
}
