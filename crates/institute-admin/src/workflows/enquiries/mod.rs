//! Enquiry intake, fee ledger, follow-up calls, and bulk CSV import.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Enquiry, EnquiryDraft, EnquiryId, EnquiryPatch, EnquirySummaryView, EnquiryView, FeeChanges,
    FeeLedger, FollowUpNote, MAX_FOLLOW_UPS,
};
pub use import::{EnquiryImportError, EnquiryImporter};
pub use repository::EnquiryRepository;
pub use router::enquiry_router;
pub use service::{EnquiryService, EnquiryServiceError};
