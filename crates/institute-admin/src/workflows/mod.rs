pub mod catalog;
pub mod demos;
pub mod enquiries;
pub(crate) mod http;
pub mod placement;
