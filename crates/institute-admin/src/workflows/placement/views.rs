use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::domain::{Experience, ExperienceId, PlacementId, StudentPlacement};
use crate::workflows::enquiries::{Enquiry, EnquiryId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceView {
    pub id: ExperienceId,
    pub job_title: String,
    pub employer: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub ongoing: bool,
}

impl From<&Experience> for ExperienceView {
    fn from(experience: &Experience) -> Self {
        Self {
            id: experience.id,
            job_title: experience.job_title.clone(),
            employer: experience.employer.clone(),
            start_date: experience.start_date,
            end_date: experience.end_date,
            ongoing: experience.ongoing,
        }
    }
}

/// Stored placement as returned to the intake form and staff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementView {
    pub id: PlacementId,
    pub enquiry: EnquiryId,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub course: String,
    pub location_current: Option<String>,
    pub consent: bool,
    pub experiences: Vec<ExperienceView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StudentPlacement> for PlacementView {
    fn from(placement: &StudentPlacement) -> Self {
        Self {
            id: placement.id,
            enquiry: placement.enquiry,
            full_name: placement.full_name.clone(),
            phone: placement.phone.clone(),
            email: placement.email.clone(),
            course: placement.course.clone(),
            location_current: placement.location_current.clone(),
            consent: placement.consent,
            experiences: placement.experiences.iter().map(ExperienceView::from).collect(),
            created_at: placement.created_at,
            updated_at: placement.updated_at,
        }
    }
}

/// Unsaved form values derived from the enquiry before the first submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefillView {
    pub enquiry: EnquiryId,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub course: Option<String>,
    pub location_current: Option<String>,
    pub consent: bool,
}

impl From<&Enquiry> for PrefillView {
    fn from(enquiry: &Enquiry) -> Self {
        Self {
            enquiry: enquiry.id,
            full_name: enquiry.name.clone(),
            phone: enquiry.phone.clone(),
            email: enquiry.email.clone(),
            course: enquiry.module.clone(),
            location_current: enquiry.current_location.clone(),
            consent: enquiry.consent,
        }
    }
}

/// What the intake form should show for an enquiry.
///
/// Serializes as `{"prefilled": bool, "data": {...}}`, where `prefilled` is true once a
/// placement has been stored.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeState {
    Submitted(PlacementView),
    Prefill(PrefillView),
}

impl IntakeState {
    pub fn is_prefilled(&self) -> bool {
        matches!(self, IntakeState::Submitted(_))
    }
}

impl Serialize for IntakeState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("IntakeState", 2)?;
        state.serialize_field("prefilled", &self.is_prefilled())?;
        match self {
            IntakeState::Submitted(view) => state.serialize_field("data", view)?,
            IntakeState::Prefill(view) => state.serialize_field("data", view)?,
        }
        state.end()
    }
}
