use super::domain::{NewPlacement, StudentPlacement};
use crate::store::RepositoryError;
use crate::workflows::enquiries::{EnquiryId, EnquiryRepository};

/// Storage abstraction for placements. Placements are looked up through the enquiry that
/// anchors them, never embedded in it.
pub trait PlacementRepository: EnquiryRepository {
    fn placement_for_enquiry(
        &self,
        enquiry: EnquiryId,
    ) -> Result<Option<StudentPlacement>, RepositoryError>;

    /// Store a placement with its experiences and close the enquiry's intake link as one
    /// all-or-nothing unit. `link_active` is the only enquiry field written.
    ///
    /// Returns [`RepositoryError::Conflict`] when a placement already references the enquiry
    /// and [`RepositoryError::NotFound`] when the enquiry does not exist; in both cases
    /// nothing is written.
    fn submit_placement(&self, placement: NewPlacement)
        -> Result<StudentPlacement, RepositoryError>;

    /// Run `change` against the placement stored for `enquiry` under one lock and persist
    /// the result. Experiences are left as stored whatever `change` does to them.
    ///
    /// Nothing is written when `change` fails. A missing placement is
    /// [`RepositoryError::NotFound`].
    fn modify_placement<E, F>(&self, enquiry: EnquiryId, change: F) -> Result<StudentPlacement, E>
    where
        F: FnOnce(&mut StudentPlacement) -> Result<(), E>,
        E: From<RepositoryError>;
}
