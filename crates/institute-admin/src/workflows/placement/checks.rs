use chrono::{DateTime, Utc};
use validator::Validate;

use super::domain::{
    ExperienceSubmission, NewExperience, NewPlacement, PlacementPatch, PlacementSubmission,
};
use crate::validation::{check_not_blank, check_phone, FieldErrors, REQUIRED};
use crate::workflows::enquiries::EnquiryId;

const EXPERIENCES: &str = "experiences";

/// Validate a first submission, including every nested experience, and convert it into the
/// record handed to the store.
pub(crate) fn placement_from_submission(
    enquiry: EnquiryId,
    submission: PlacementSubmission,
    now: DateTime<Utc>,
) -> Result<NewPlacement, FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Err(derived) = submission.validate() {
        errors.merge(&derived);
    }

    check_not_blank(&mut errors, "full_name", submission.full_name.as_deref());
    check_not_blank(&mut errors, "course", submission.course.as_deref());
    if let Some(phone) = submission.phone.as_deref() {
        if errors.get("phone").is_none() {
            check_phone(&mut errors, "phone", phone);
        }
    }
    for (index, experience) in submission.experiences.iter().enumerate() {
        check_experience(&mut errors, index, experience);
    }
    errors.into_result()?;

    let experiences = submission
        .experiences
        .into_iter()
        .map(|experience| NewExperience {
            job_title: experience.job_title.unwrap_or_default().trim().to_string(),
            employer: experience.employer.unwrap_or_default().trim().to_string(),
            start_date: experience.start_date.unwrap_or_default(),
            end_date: experience.end_date,
            ongoing: experience.ongoing,
        })
        .collect();

    Ok(NewPlacement {
        enquiry,
        full_name: submission.full_name.unwrap_or_default().trim().to_string(),
        phone: submission.phone.unwrap_or_default().trim().to_string(),
        email: submission.email.unwrap_or_default().trim().to_string(),
        course: submission.course.unwrap_or_default().trim().to_string(),
        location_current: submission.location_current,
        consent: submission.consent,
        experiences,
        submitted_at: now,
    })
}

/// Validate only the fields present on a partial update.
pub(crate) fn check_patch(patch: &PlacementPatch) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Err(derived) = patch.validate() {
        errors.merge(&derived);
    }

    check_not_blank(&mut errors, "full_name", patch.full_name.as_deref());
    check_not_blank(&mut errors, "course", patch.course.as_deref());
    if let Some(phone) = patch.phone.as_deref() {
        if errors.get("phone").is_none() {
            check_phone(&mut errors, "phone", phone);
        }
    }
    errors.into_result()
}

fn check_experience(errors: &mut FieldErrors, index: usize, experience: &ExperienceSubmission) {
    for (field, value) in [
        ("job_title", experience.job_title.as_deref()),
        ("employer", experience.employer.as_deref()),
    ] {
        if value.is_some_and(|text| text.trim().is_empty()) {
            errors.add_nested(EXPERIENCES, index, field, crate::validation::BLANK);
        }
    }

    match (experience.ongoing, experience.end_date) {
        (true, Some(_)) => errors.add_nested(
            EXPERIENCES,
            index,
            "end_date",
            "Leave the end date empty for an ongoing role.",
        ),
        (false, None) => errors.add_nested(EXPERIENCES, index, "end_date", REQUIRED),
        (false, Some(end)) => {
            if let Some(start) = experience.start_date {
                if end < start {
                    errors.add_nested(
                        EXPERIENCES,
                        index,
                        "end_date",
                        "End date cannot be before the start date.",
                    );
                }
            }
        }
        (true, None) => {}
    }
}
