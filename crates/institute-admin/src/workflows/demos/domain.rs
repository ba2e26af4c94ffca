use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{check_not_blank, check_phone, FieldErrors, REQUIRED};
use crate::workflows::enquiries::{Enquiry, EnquiryId, EnquirySummaryView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemoId(pub u64);

impl fmt::Display for DemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a demo booking stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoClassStatus {
    #[default]
    Pending,
    Scheduled,
    Attended,
    Cancelled,
}

impl DemoClassStatus {
    pub const ALL: [DemoClassStatus; 4] = [
        DemoClassStatus::Pending,
        DemoClassStatus::Scheduled,
        DemoClassStatus::Attended,
        DemoClassStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DemoClassStatus::Pending => "pending",
            DemoClassStatus::Scheduled => "scheduled",
            DemoClassStatus::Attended => "attended",
            DemoClassStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for DemoClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the demo class list.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoEntry {
    pub id: DemoId,
    /// Enquiry the booking came from, if any.
    pub enquiry: Option<EnquiryId>,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub package_code: Option<String>,
    pub package: Option<String>,
    pub status: DemoClassStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DemoEntry {
    /// Pending booking carrying the enquiry's contact details, its batch code and its module.
    pub fn from_enquiry(enquiry: &Enquiry, now: DateTime<Utc>) -> Self {
        Self {
            id: DemoId(0),
            enquiry: Some(enquiry.id),
            full_name: enquiry.name.clone(),
            phone_number: enquiry.phone.clone(),
            email: enquiry.email.clone(),
            package_code: enquiry.batch_code.clone(),
            package: enquiry.module.clone(),
            status: DemoClassStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn view(&self, enquiry: Option<&Enquiry>) -> DemoView {
        DemoView {
            id: self.id,
            student_enquiry: enquiry.map(Enquiry::summary_view),
            full_name: self.full_name.clone(),
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
            package_code: self.package_code.clone(),
            package: self.package.clone(),
            demo_class_status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DemoDraft {
    pub student_enquiry_id: Option<EnquiryId>,
    #[validate(
        required(message = "This field is required."),
        length(max = 150, message = "Ensure this field has no more than 150 characters.")
    )]
    pub full_name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 7, max = 20, message = "Enter a valid phone number.")
    )]
    pub phone_number: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub package_code: Option<String>,
    #[validate(length(max = 120, message = "Ensure this field has no more than 120 characters."))]
    pub package: Option<String>,
    pub demo_class_status: Option<String>,
}

impl DemoDraft {
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(derived) = self.validate() {
            errors.merge(&derived);
        }
        check_not_blank(&mut errors, "full_name", self.full_name.as_deref());
        if let Some(phone) = self.phone_number.as_deref() {
            if errors.get("phone_number").is_none() {
                check_phone(&mut errors, "phone_number", phone);
            }
        }
        if let Some(raw) = self.demo_class_status.as_deref() {
            check_status(&mut errors, raw);
        }
        errors.into_result()
    }

    /// Build an unsaved entry from a draft that already passed [`DemoDraft::check`].
    pub fn into_entry(self, now: DateTime<Utc>) -> DemoEntry {
        DemoEntry {
            id: DemoId(0),
            enquiry: self.student_enquiry_id,
            full_name: self.full_name.unwrap_or_default().trim().to_string(),
            phone_number: self.phone_number.unwrap_or_default().trim().to_string(),
            email: self.email,
            package_code: self.package_code,
            package: self.package,
            status: self
                .demo_class_status
                .as_deref()
                .and_then(DemoClassStatus::parse)
                .unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of the status change endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DemoStatusUpdate {
    pub demo_class_status: Option<String>,
}

impl DemoStatusUpdate {
    pub fn status(&self) -> Result<DemoClassStatus, FieldErrors> {
        let Some(raw) = self.demo_class_status.as_deref() else {
            return Err(FieldErrors::single("demo_class_status", REQUIRED));
        };
        let mut errors = FieldErrors::new();
        check_status(&mut errors, raw);
        errors.into_result()?;
        Ok(DemoClassStatus::parse(raw).unwrap_or_default())
    }
}

fn check_status(errors: &mut FieldErrors, raw: &str) {
    if DemoClassStatus::parse(raw).is_none() {
        errors.add("demo_class_status", format!("\"{raw}\" is not a valid choice."));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoView {
    pub id: DemoId,
    pub student_enquiry: Option<EnquirySummaryView>,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub package_code: Option<String>,
    pub package: Option<String>,
    pub demo_class_status: DemoClassStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
