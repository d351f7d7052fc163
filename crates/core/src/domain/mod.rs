pub mod compliance;
pub mod customer;
pub mod interaction;
