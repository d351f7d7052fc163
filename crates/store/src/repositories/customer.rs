use ridecrm_core::domain::customer::Customer;

use super::RepositoryError;
use crate::document::{Collection, DocumentStore};

#[derive(Clone)]
pub struct CustomerRepository {
    store: DocumentStore,
}

impl CustomerRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Full collection in storage order (insertion order, not sorted).
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.store.load(Collection::Customers).await?)
    }

    pub async fn get(&self, phone_number: &str) -> Result<Customer, RepositoryError> {
        let customers: Vec<Customer> = self.store.load(Collection::Customers).await?;

        customers
            .into_iter()
            .find(|customer| customer.phone_number == phone_number)
            .ok_or_else(|| RepositoryError::NotFound("Customer not found".to_string()))
    }

    /// Create or fully overwrite the record with this phone number.
    ///
    /// An existing record keeps its position in the collection; a new
    /// one is appended last. The whole collection is persisted either
    /// way.
    pub async fn upsert(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        let _guard = self.store.gate(Collection::Customers).lock().await;

        let mut customers: Vec<Customer> = self.store.load(Collection::Customers).await?;
        match customers
            .iter_mut()
            .find(|existing| existing.phone_number == customer.phone_number)
        {
            Some(existing) => *existing = customer.clone(),
            None => customers.push(customer.clone()),
        }

        self.store.save(Collection::Customers, &customers).await?;
        Ok(customer)
    }
}
