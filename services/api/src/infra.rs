use institute_admin::error::AppError;
use institute_admin::workflows::enquiries::{EnquiryImporter, EnquiryRepository, EnquiryService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load an enquiry export into the store. Nothing is stored unless every row is valid.
pub(crate) fn seed_enquiries<R>(service: &EnquiryService<R>, path: &Path) -> Result<usize, AppError>
where
    R: EnquiryRepository + 'static,
{
    let drafts = EnquiryImporter::drafts_from_path(path)?;
    let stored = EnquiryImporter::import(service, drafts)?;
    info!(path = %path.display(), enquiries = stored.len(), "seeded enquiries");
    Ok(stored.len())
}
