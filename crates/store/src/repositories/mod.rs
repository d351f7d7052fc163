use thiserror::Error;

use crate::document::StoreError;

pub mod compliance;
pub mod customer;
pub mod interaction;

pub use compliance::ComplianceRepository;
pub use customer::CustomerRepository;
pub use interaction::InteractionRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested key absent from a collection. The message is shown to
    /// the caller verbatim.
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
