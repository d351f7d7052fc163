use ridecrm_core::config::AppConfig;
use ridecrm_core::domain::customer::Customer;
use ridecrm_core::domain::interaction::Interaction;
use ridecrm_store::{
    Collection, ComplianceRepository, CustomerRepository, DocumentStore, InteractionRepository,
    StoreError, ViewComposer,
};
use thiserror::Error;
use tracing::info;

use crate::api::ApiState;

pub struct Application {
    pub config: AppConfig,
    pub store: DocumentStore,
    pub state: ApiState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("data directory setup failed: {0}")]
    DataDir(#[source] std::io::Error),
    #[error("collection seeding failed: {0}")]
    Seed(#[from] StoreError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    tokio::fs::create_dir_all(&config.storage.data_dir)
        .await
        .map_err(BootstrapError::DataDir)?;

    let store = DocumentStore::new(config.storage.data_dir.clone());
    seed_list_collections(&store).await?;
    info!(
        event_name = "system.bootstrap.storage_ready",
        data_dir = %config.storage.data_dir.display(),
        "document store initialized"
    );

    let compliance = ComplianceRepository::new(store.clone());
    let state = ApiState {
        customers: CustomerRepository::new(store.clone()),
        interactions: InteractionRepository::new(store.clone(), compliance.clone()),
        compliance,
        views: ViewComposer::new(store.clone()),
    };

    Ok(Application { config, store, state })
}

/// The append-style collections start out as empty lists when absent.
/// Compliance, products and dashboard documents are deployment-provided
/// seed data and are left alone; reads against a missing one fail until
/// it is provisioned.
async fn seed_list_collections(store: &DocumentStore) -> Result<(), StoreError> {
    match store.load::<Vec<Customer>>(Collection::Customers).await {
        Ok(_) => {}
        Err(StoreError::NotFound(_)) => {
            store.save(Collection::Customers, &Vec::<Customer>::new()).await?;
            info!(event_name = "system.bootstrap.collection_seeded", collection = "customers.json", "seeded empty collection");
        }
        Err(error) => return Err(error),
    }

    match store.load::<Vec<Interaction>>(Collection::Interactions).await {
        Ok(_) => {}
        Err(StoreError::NotFound(_)) => {
            store.save(Collection::Interactions, &Vec::<Interaction>::new()).await?;
            info!(event_name = "system.bootstrap.collection_seeded", collection = "interactions.json", "seeded empty collection");
        }
        Err(error) => return Err(error),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use ridecrm_core::config::AppConfig;
    use ridecrm_core::domain::customer::Customer;
    use ridecrm_store::Collection;
    use tempfile::TempDir;

    use crate::bootstrap::bootstrap_with_config;

    #[tokio::test]
    async fn bootstrap_seeds_missing_list_collections() {
        let dir = TempDir::new().expect("temp dir");
        let mut config = AppConfig::default();
        config.storage.data_dir = dir.path().join("data");

        let app = bootstrap_with_config(config).await.expect("bootstrap");

        let customers: Vec<Customer> =
            app.store.load(Collection::Customers).await.expect("customers seeded");
        assert!(customers.is_empty());
        assert!(dir.path().join("data").join("interactions.json").exists());
    }

    #[tokio::test]
    async fn bootstrap_leaves_existing_collections_alone() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("customers.json"), "[{\"bad\": ")
            .expect("write unparseable seed");

        let mut config = AppConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();

        // An existing-but-broken document is surfaced, never overwritten.
        let result = bootstrap_with_config(config).await;
        assert!(result.is_err());

        let raw = std::fs::read_to_string(dir.path().join("customers.json")).expect("read");
        assert_eq!(raw, "[{\"bad\": ");
    }
}
