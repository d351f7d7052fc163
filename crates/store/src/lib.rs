pub mod document;
pub mod repositories;
pub mod views;

pub use document::{Collection, DocumentStore, StoreError};
pub use repositories::{
    ComplianceRepository, CustomerRepository, InteractionRepository, RepositoryError,
};
pub use views::ViewComposer;
