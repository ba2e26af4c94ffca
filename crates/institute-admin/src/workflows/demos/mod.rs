//! Demo class list: prospective students booked for a trial class, either entered directly or
//! moved over from an enquiry.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{DemoClassStatus, DemoDraft, DemoEntry, DemoId, DemoStatusUpdate, DemoView};
pub use repository::DemoRepository;
pub use router::demo_router;
pub use service::{DemoService, DemoServiceError};
