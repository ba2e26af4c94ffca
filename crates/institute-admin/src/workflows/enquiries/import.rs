use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{Enquiry, EnquiryDraft};
use super::repository::EnquiryRepository;
use super::service::{EnquiryService, EnquiryServiceError};
use crate::validation::FieldErrors;

#[derive(Debug)]
pub enum EnquiryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, errors: FieldErrors },
    Service(EnquiryServiceError),
}

impl std::fmt::Display for EnquiryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnquiryImportError::Io(err) => write!(f, "failed to read enquiry export: {}", err),
            EnquiryImportError::Csv(err) => write!(f, "invalid enquiry CSV data: {}", err),
            EnquiryImportError::InvalidRow { line, errors } => {
                write!(f, "enquiry on line {} rejected ({})", line, errors)
            }
            EnquiryImportError::Service(err) => {
                write!(f, "could not store imported enquiry: {}", err)
            }
        }
    }
}

impl std::error::Error for EnquiryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnquiryImportError::Io(err) => Some(err),
            EnquiryImportError::Csv(err) => Some(err),
            EnquiryImportError::InvalidRow { errors, .. } => Some(errors),
            EnquiryImportError::Service(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for EnquiryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for EnquiryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<EnquiryServiceError> for EnquiryImportError {
    fn from(err: EnquiryServiceError) -> Self {
        Self::Service(err)
    }
}

/// Loads enquiries from the intake spreadsheet export.
///
/// Every row is validated before anything is stored, so a bad row leaves the store untouched.
pub struct EnquiryImporter;

impl EnquiryImporter {
    pub fn drafts_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<EnquiryDraft>, EnquiryImportError> {
        let file = std::fs::File::open(path)?;
        Self::drafts_from_reader(file)
    }

    pub fn drafts_from_reader<R: Read>(reader: R) -> Result<Vec<EnquiryDraft>, EnquiryImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut drafts = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            // Quoted cells may span lines, so report where the record starts in the file.
            let line = record
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or_default();
            let draft = record.deserialize::<EnquiryRow>(Some(&headers))?.into_draft();
            draft
                .check()
                .map_err(|errors| EnquiryImportError::InvalidRow { line, errors })?;
            drafts.push(draft);
        }

        Ok(drafts)
    }

    pub fn import<R>(
        service: &EnquiryService<R>,
        drafts: Vec<EnquiryDraft>,
    ) -> Result<Vec<Enquiry>, EnquiryImportError>
    where
        R: EnquiryRepository + 'static,
    {
        drafts
            .into_iter()
            .map(|draft| service.create(draft).map_err(EnquiryImportError::from))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct EnquiryRow {
    name: String,
    phone: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    module: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    current_location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    training_mode: Option<String>,
    #[serde(default)]
    package_cost: Option<i64>,
    #[serde(default)]
    amount_paid: Option<i64>,
    #[serde(default)]
    discount: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    consent: Option<String>,
}

impl EnquiryRow {
    fn into_draft(self) -> EnquiryDraft {
        EnquiryDraft {
            name: Some(self.name),
            phone: Some(self.phone),
            email: self.email,
            module: self.module,
            current_location: self.current_location,
            training_mode: self.training_mode,
            consent: self.consent.as_deref().map(truthy).unwrap_or(false),
            package_cost: self.package_cost,
            amount_paid: self.amount_paid,
            discount: self.discount,
            ..EnquiryDraft::default()
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
