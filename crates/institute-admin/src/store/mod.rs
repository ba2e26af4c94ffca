//! Record store errors and the in-memory backend used by the API service and tests.

#[cfg(test)]
mod interleaved;
mod memory;

#[cfg(test)]
pub(crate) use interleaved::InterleavedStore;
pub use memory::MemoryRecordStore;

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
