use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::workflows::enquiries::EnquiryId;
use crate::workflows::http::nullable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(pub u64);

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceId(pub u64);

/// Prior employment entry owned by exactly one placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    pub id: ExperienceId,
    pub job_title: String,
    pub employer: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub ongoing: bool,
}

/// Placement application tied one-to-one to an enquiry.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentPlacement {
    pub id: PlacementId,
    pub enquiry: EnquiryId,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub course: String,
    pub location_current: Option<String>,
    pub consent: bool,
    /// Kept in submission order.
    pub experiences: Vec<Experience>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Experience entry accepted by the store, before it has an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExperience {
    pub job_title: String,
    pub employer: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub ongoing: bool,
}

/// Validated placement ready for the store's atomic submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlacement {
    pub enquiry: EnquiryId,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub course: String,
    pub location_current: Option<String>,
    pub consent: bool,
    pub experiences: Vec<NewExperience>,
    pub submitted_at: DateTime<Utc>,
}

/// One experience entry as posted by the student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExperienceSubmission {
    #[validate(
        required(message = "This field is required."),
        length(max = 120, message = "Ensure this field has no more than 120 characters.")
    )]
    pub job_title: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(max = 120, message = "Ensure this field has no more than 120 characters.")
    )]
    pub employer: Option<String>,
    #[validate(required(message = "This field is required."))]
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub ongoing: bool,
}

/// Full placement form as posted on first submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlacementSubmission {
    #[validate(
        required(message = "This field is required."),
        length(max = 150, message = "Ensure this field has no more than 150 characters.")
    )]
    pub full_name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 7, max = 20, message = "Enter a valid phone number.")
    )]
    pub phone: Option<String>,
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(max = 120, message = "Ensure this field has no more than 120 characters.")
    )]
    pub course: Option<String>,
    #[validate(length(max = 120, message = "Ensure this field has no more than 120 characters."))]
    pub location_current: Option<String>,
    #[serde(default)]
    pub consent: bool,
    #[serde(default)]
    #[validate(nested)]
    pub experiences: Vec<ExperienceSubmission>,
}

/// Partial update posted by placement staff. Experiences cannot be changed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlacementPatch {
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub full_name: Option<String>,
    #[validate(length(min = 7, max = 20, message = "Enter a valid phone number."))]
    pub phone: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 120, message = "Ensure this field has no more than 120 characters."))]
    pub course: Option<String>,
    /// `null` clears the stored location; leaving the field out keeps it.
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 120, message = "Ensure this field has no more than 120 characters."))]
    pub location_current: Option<Option<String>>,
    pub consent: Option<bool>,
}

impl PlacementPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.course.is_none()
            && self.location_current.is_none()
            && self.consent.is_none()
    }

    pub fn apply(self, placement: &mut StudentPlacement, now: DateTime<Utc>) {
        if let Some(full_name) = self.full_name {
            placement.full_name = full_name.trim().to_string();
        }
        if let Some(phone) = self.phone {
            placement.phone = phone.trim().to_string();
        }
        if let Some(email) = self.email {
            placement.email = email.trim().to_string();
        }
        if let Some(course) = self.course {
            placement.course = course.trim().to_string();
        }
        if let Some(location_current) = self.location_current {
            placement.location_current = location_current;
        }
        if let Some(consent) = self.consent {
            placement.consent = consent;
        }
        placement.updated_at = now;
    }
}
