//! Admin backend for a training institute: enquiries, the demo class list, the course
//! catalog and the enquiry-to-placement intake workflow.

pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;
pub mod validation;
pub mod workflows;
