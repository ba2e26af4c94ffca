use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{check_not_blank, check_phone, FieldErrors};
use crate::workflows::http::nullable;

/// Maximum number of follow-up call notes kept per enquiry (calling 1 to 5).
pub const MAX_FOLLOW_UPS: usize = 5;

/// Identifier assigned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnquiryId(pub u64);

impl fmt::Display for EnquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Package cost, payments, and discount with the balance derived from them.
///
/// The balance is only ever produced by [`FeeLedger::apply`], so it cannot drift from
/// its inputs. Inputs that were never supplied count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeLedger {
    package_cost: Option<i64>,
    amount_paid: Option<i64>,
    discount: Option<i64>,
    balance_amount: i64,
}

/// Fee inputs supplied by a write; `None` keeps the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeChanges {
    pub package_cost: Option<i64>,
    pub amount_paid: Option<i64>,
    pub discount: Option<i64>,
}

impl FeeChanges {
    pub fn touches_any(&self) -> bool {
        self.package_cost.is_some() || self.amount_paid.is_some() || self.discount.is_some()
    }
}

impl FeeLedger {
    pub fn new(changes: FeeChanges) -> Self {
        let mut ledger = Self::default();
        ledger.apply(changes);
        ledger
    }

    pub fn apply(&mut self, changes: FeeChanges) {
        if let Some(cost) = changes.package_cost {
            self.package_cost = Some(cost);
        }
        if let Some(paid) = changes.amount_paid {
            self.amount_paid = Some(paid);
        }
        if let Some(discount) = changes.discount {
            self.discount = Some(discount);
        }
        self.balance_amount = self.package_cost.unwrap_or(0)
            - self.amount_paid.unwrap_or(0)
            - self.discount.unwrap_or(0);
    }

    pub fn package_cost(&self) -> Option<i64> {
        self.package_cost
    }

    pub fn amount_paid(&self) -> Option<i64> {
        self.amount_paid
    }

    pub fn discount(&self) -> Option<i64> {
        self.discount
    }

    pub fn balance_amount(&self) -> i64 {
        self.balance_amount
    }
}

/// A prospective student's contact, interest, and fee record.
#[derive(Debug, Clone, PartialEq)]
pub struct Enquiry {
    pub id: EnquiryId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub current_location: Option<String>,
    pub module: Option<String>,
    pub training_mode: Option<String>,
    pub training_time: Option<String>,
    pub start_time: Option<String>,
    pub follow_ups: Vec<String>,
    pub previous_interaction: Option<String>,
    pub batch_code: Option<String>,
    pub batch_subject: Option<String>,
    pub consent: bool,
    pub fees: FeeLedger,
    /// Whether the public placement intake link may still be used.
    pub link_active: bool,
    /// Set once the enquiry has been handed to the demo class list.
    pub moved_to_demo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enquiry {
    /// Build an unsaved enquiry from a draft that already passed validation. The store
    /// assigns the real identifier on insert.
    pub fn from_draft(draft: EnquiryDraft, now: DateTime<Utc>) -> Self {
        let fees = FeeLedger::new(draft.fee_changes());
        Self {
            id: EnquiryId(0),
            name: draft.name.unwrap_or_default().trim().to_string(),
            phone: draft.phone.unwrap_or_default().trim().to_string(),
            email: draft.email,
            current_location: draft.current_location,
            module: draft.module,
            training_mode: draft.training_mode,
            training_time: draft.training_time,
            start_time: draft.start_time,
            follow_ups: draft.follow_ups,
            previous_interaction: draft.previous_interaction,
            batch_code: draft.batch_code,
            batch_subject: draft.batch_subject,
            consent: draft.consent,
            fees,
            link_active: true,
            moved_to_demo: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn follow_ups_remaining(&self) -> usize {
        MAX_FOLLOW_UPS.saturating_sub(self.follow_ups.len())
    }

    pub fn view(&self) -> EnquiryView {
        EnquiryView {
            id: self.id,
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            current_location: self.current_location.clone(),
            module: self.module.clone(),
            training_mode: self.training_mode.clone(),
            training_time: self.training_time.clone(),
            start_time: self.start_time.clone(),
            follow_ups: self.follow_ups.clone(),
            previous_interaction: self.previous_interaction.clone(),
            batch_code: self.batch_code.clone(),
            batch_subject: self.batch_subject.clone(),
            consent: self.consent,
            package_cost: self.fees.package_cost(),
            amount_paid: self.fees.amount_paid(),
            discount: self.fees.discount(),
            balance_amount: self.fees.balance_amount(),
            link_active: self.link_active,
            moved_to_demo: self.moved_to_demo,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn summary_view(&self) -> EnquirySummaryView {
        EnquirySummaryView {
            id: self.id,
            full_name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            location: self.current_location.clone(),
            module: self.module.clone(),
            training_mode: self.training_mode.clone(),
            training_timings: self.training_time.clone(),
            start_time: self.start_time.clone(),
            follow_ups: self.follow_ups.clone(),
            previous_interaction: self.previous_interaction.clone(),
            batch_code: self.batch_code.clone(),
            batch_subject: self.batch_subject.clone(),
            moved_to_demo: self.moved_to_demo,
        }
    }
}

/// Intake form payload. `balance_amount` and `link_active` are not accepted from clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EnquiryDraft {
    #[validate(
        required(message = "This field is required."),
        length(max = 150, message = "Ensure this field has no more than 150 characters.")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 7, max = 20, message = "Enter a valid phone number.")
    )]
    pub phone: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 120, message = "Ensure this field has no more than 120 characters."))]
    pub current_location: Option<String>,
    #[validate(length(max = 120, message = "Ensure this field has no more than 120 characters."))]
    pub module: Option<String>,
    pub training_mode: Option<String>,
    pub training_time: Option<String>,
    pub start_time: Option<String>,
    #[serde(default)]
    #[validate(length(max = 5, message = "At most five follow-up notes are allowed."))]
    pub follow_ups: Vec<String>,
    pub previous_interaction: Option<String>,
    pub batch_code: Option<String>,
    pub batch_subject: Option<String>,
    #[serde(default)]
    pub consent: bool,
    #[validate(range(min = 0, max = 100_000_000, message = "Enter an amount between 0 and 100000000."))]
    pub package_cost: Option<i64>,
    #[validate(range(min = 0, max = 100_000_000, message = "Enter an amount between 0 and 100000000."))]
    pub amount_paid: Option<i64>,
    #[validate(range(min = 0, max = 100_000_000, message = "Enter an amount between 0 and 100000000."))]
    pub discount: Option<i64>,
}

impl EnquiryDraft {
    pub fn fee_changes(&self) -> FeeChanges {
        FeeChanges {
            package_cost: self.package_cost,
            amount_paid: self.amount_paid,
            discount: self.discount,
        }
    }

    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(derived) = self.validate() {
            errors.merge(&derived);
        }
        check_not_blank(&mut errors, "name", self.name.as_deref());
        if let Some(phone) = self.phone.as_deref() {
            if errors.get("phone").is_none() {
                check_phone(&mut errors, "phone", phone);
            }
        }
        for (index, note) in self.follow_ups.iter().enumerate() {
            if note.trim().is_empty() {
                errors.add_nested("follow_ups", index, "note", crate::validation::BLANK);
            }
        }
        errors.into_result()
    }
}

/// Partial update. Only supplied fields are validated and applied.
///
/// Optional text fields take an explicit `null` to clear the stored value. Name and phone are
/// required on the record, and `null` fee inputs leave the ledger as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EnquiryPatch {
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub name: Option<String>,
    #[validate(length(min = 7, max = 20, message = "Enter a valid phone number."))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 120, message = "Ensure this field has no more than 120 characters."))]
    pub current_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 120, message = "Ensure this field has no more than 120 characters."))]
    pub module: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub training_mode: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub training_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub previous_interaction: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub batch_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub batch_subject: Option<Option<String>>,
    pub consent: Option<bool>,
    #[validate(range(min = 0, max = 100_000_000, message = "Enter an amount between 0 and 100000000."))]
    pub package_cost: Option<i64>,
    #[validate(range(min = 0, max = 100_000_000, message = "Enter an amount between 0 and 100000000."))]
    pub amount_paid: Option<i64>,
    #[validate(range(min = 0, max = 100_000_000, message = "Enter an amount between 0 and 100000000."))]
    pub discount: Option<i64>,
}

impl EnquiryPatch {
    pub fn fee_changes(&self) -> FeeChanges {
        FeeChanges {
            package_cost: self.package_cost,
            amount_paid: self.amount_paid,
            discount: self.discount,
        }
    }

    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(derived) = self.validate() {
            errors.merge(&derived);
        }
        check_not_blank(&mut errors, "name", self.name.as_deref());
        if let Some(phone) = self.phone.as_deref() {
            if errors.get("phone").is_none() {
                check_phone(&mut errors, "phone", phone);
            }
        }
        errors.into_result()
    }

    /// Copy supplied fields onto the enquiry and re-derive the balance.
    pub fn apply(self, enquiry: &mut Enquiry, now: DateTime<Utc>) {
        let fees = self.fee_changes();
        if let Some(name) = self.name {
            enquiry.name = name.trim().to_string();
        }
        if let Some(phone) = self.phone {
            enquiry.phone = phone.trim().to_string();
        }
        if let Some(email) = self.email {
            enquiry.email = email;
        }
        if let Some(current_location) = self.current_location {
            enquiry.current_location = current_location;
        }
        if let Some(module) = self.module {
            enquiry.module = module;
        }
        if let Some(training_mode) = self.training_mode {
            enquiry.training_mode = training_mode;
        }
        if let Some(training_time) = self.training_time {
            enquiry.training_time = training_time;
        }
        if let Some(start_time) = self.start_time {
            enquiry.start_time = start_time;
        }
        if let Some(previous_interaction) = self.previous_interaction {
            enquiry.previous_interaction = previous_interaction;
        }
        if let Some(batch_code) = self.batch_code {
            enquiry.batch_code = batch_code;
        }
        if let Some(batch_subject) = self.batch_subject {
            enquiry.batch_subject = batch_subject;
        }
        if let Some(consent) = self.consent {
            enquiry.consent = consent;
        }
        enquiry.fees.apply(fees);
        enquiry.updated_at = now;
    }
}

/// Body of the follow-up endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FollowUpNote {
    pub note: Option<String>,
}

/// Full enquiry as exposed to admin clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnquiryView {
    pub id: EnquiryId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub current_location: Option<String>,
    pub module: Option<String>,
    pub training_mode: Option<String>,
    pub training_time: Option<String>,
    pub start_time: Option<String>,
    pub follow_ups: Vec<String>,
    pub previous_interaction: Option<String>,
    pub batch_code: Option<String>,
    pub batch_subject: Option<String>,
    pub consent: bool,
    pub package_cost: Option<i64>,
    pub amount_paid: Option<i64>,
    pub discount: Option<i64>,
    pub balance_amount: i64,
    pub link_active: bool,
    pub moved_to_demo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row used by the enquiry board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquirySummaryView {
    pub id: EnquiryId,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub module: Option<String>,
    pub training_mode: Option<String>,
    pub training_timings: Option<String>,
    pub start_time: Option<String>,
    pub follow_ups: Vec<String>,
    pub previous_interaction: Option<String>,
    pub batch_code: Option<String>,
    pub batch_subject: Option<String>,
    pub moved_to_demo: bool,
}
