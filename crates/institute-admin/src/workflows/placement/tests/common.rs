use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};

use crate::store::{MemoryRecordStore, RepositoryError};
use crate::workflows::enquiries::{Enquiry, EnquiryDraft, EnquiryId, EnquiryRepository};
use crate::workflows::placement::{
    ExperienceSubmission, NewPlacement, PlacementIntakeService, PlacementRepository,
    PlacementSubmission, StudentPlacement,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Store holding one enquiry, the way the intake desk would have recorded it.
pub(super) fn seeded_store() -> (Arc<MemoryRecordStore>, EnquiryId) {
    let store = Arc::new(MemoryRecordStore::default());
    let draft = EnquiryDraft {
        name: Some("Asha Rao".to_string()),
        phone: Some("9876543210".to_string()),
        email: Some("asha@example.com".to_string()),
        module: Some("Data Engineering".to_string()),
        current_location: Some("Pune".to_string()),
        consent: true,
        ..EnquiryDraft::default()
    };
    let enquiry = store
        .insert_enquiry(Enquiry::from_draft(draft, Utc::now()))
        .expect("seed enquiry");
    (store, enquiry.id)
}

pub(super) fn intake_service(
    store: &Arc<MemoryRecordStore>,
) -> PlacementIntakeService<MemoryRecordStore> {
    PlacementIntakeService::new(Arc::clone(store))
}

pub(super) fn submission() -> PlacementSubmission {
    PlacementSubmission {
        full_name: Some("Asha Rao".to_string()),
        phone: Some("9876543210".to_string()),
        email: Some("asha@example.com".to_string()),
        course: Some("Data Engineering".to_string()),
        location_current: Some("Pune".to_string()),
        consent: true,
        experiences: vec![
            ExperienceSubmission {
                job_title: Some("Support Analyst".to_string()),
                employer: Some("Acme Corp".to_string()),
                start_date: Some(date(2020, 7, 1)),
                end_date: Some(date(2022, 12, 31)),
                ongoing: false,
            },
            ExperienceSubmission {
                job_title: Some("Data Engineer".to_string()),
                employer: Some("Globex".to_string()),
                start_date: Some(date(2023, 1, 16)),
                end_date: None,
                ongoing: true,
            },
        ],
    }
}

pub(super) fn submission_json() -> Value {
    json!({
        "full_name": "Asha Rao",
        "phone": "9876543210",
        "email": "asha@example.com",
        "course": "Data Engineering",
        "location_current": "Pune",
        "consent": true,
        "experiences": [
            {
                "job_title": "Support Analyst",
                "employer": "Acme Corp",
                "start_date": "2020-07-01",
                "end_date": "2022-12-31",
                "ongoing": false
            },
            {
                "job_title": "Data Engineer",
                "employer": "Globex",
                "start_date": "2023-01-16",
                "ongoing": true
            }
        ]
    })
}

/// Store whose backend is down for every call.
pub(super) struct UnavailableStore;

fn unavailable() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

impl EnquiryRepository for UnavailableStore {
    fn insert_enquiry(&self, _enquiry: Enquiry) -> Result<Enquiry, RepositoryError> {
        Err(unavailable())
    }

    fn fetch_enquiry(&self, _id: EnquiryId) -> Result<Option<Enquiry>, RepositoryError> {
        Err(unavailable())
    }

    fn list_enquiries(&self) -> Result<Vec<Enquiry>, RepositoryError> {
        Err(unavailable())
    }

    fn modify_enquiry<E, F>(&self, _id: EnquiryId, _change: F) -> Result<Enquiry, E>
    where
        F: FnOnce(&mut Enquiry) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        Err(unavailable().into())
    }
}

impl PlacementRepository for UnavailableStore {
    fn placement_for_enquiry(
        &self,
        _enquiry: EnquiryId,
    ) -> Result<Option<StudentPlacement>, RepositoryError> {
        Err(unavailable())
    }

    fn submit_placement(
        &self,
        _placement: NewPlacement,
    ) -> Result<StudentPlacement, RepositoryError> {
        Err(unavailable())
    }

    fn modify_placement<E, F>(
        &self,
        _enquiry: EnquiryId,
        _change: F,
    ) -> Result<StudentPlacement, E>
    where
        F: FnOnce(&mut StudentPlacement) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        Err(unavailable().into())
    }
}
