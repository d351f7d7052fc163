use ridecrm_core::domain::compliance::{
    Checkpoint, CheckpointItem, CheckpointSet, ComplianceCheck,
};
use ridecrm_core::domain::interaction::Interaction;

use super::RepositoryError;
use crate::document::{Collection, DocumentStore};

const REVIEW_STATUS: &str = "in_review";

#[derive(Clone)]
pub struct ComplianceRepository {
    store: DocumentStore,
}

impl ComplianceRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Open a pending review for a newly created interaction.
    ///
    /// The checklist template is a static policy: every review starts
    /// with the same two categories and five required, incomplete items.
    pub async fn create_checkpoint_set(
        &self,
        interaction_id: i64,
        customer_name: &str,
        ride_date: &str,
    ) -> Result<(), RepositoryError> {
        let _guard = self.store.gate(Collection::Compliance).lock().await;

        let mut compliance: ComplianceCheck = self.store.load(Collection::Compliance).await?;
        compliance.active_compliance_checks.push(CheckpointSet {
            interaction_id,
            status: REVIEW_STATUS.to_string(),
            checkpoints: checkpoint_template(),
            customer_name: Some(customer_name.to_string()),
            ride_date: Some(ride_date.to_string()),
        });

        self.store.save(Collection::Compliance, &compliance).await?;
        Ok(())
    }

    /// The stored aggregate with interaction metadata overlaid.
    ///
    /// For every checkpoint-set (active and previous) whose interaction
    /// still exists, `customer_name` and `ride_date` are overwritten
    /// from the interaction. Dangling ids are left exactly as stored.
    pub async fn get_enriched(&self) -> Result<ComplianceCheck, RepositoryError> {
        let mut compliance: ComplianceCheck = self.store.load(Collection::Compliance).await?;
        let interactions: Vec<Interaction> = self.store.load(Collection::Interactions).await?;

        overlay_interaction_fields(&mut compliance.active_compliance_checks, &interactions);
        overlay_interaction_fields(&mut compliance.previous_compliance_checks, &interactions);

        Ok(compliance)
    }

    /// Full overwrite of the stored aggregate. Referenced interaction
    /// ids are not validated.
    pub async fn replace(
        &self,
        compliance: ComplianceCheck,
    ) -> Result<ComplianceCheck, RepositoryError> {
        let _guard = self.store.gate(Collection::Compliance).lock().await;

        self.store.save(Collection::Compliance, &compliance).await?;
        Ok(compliance)
    }
}

fn overlay_interaction_fields(sets: &mut [CheckpointSet], interactions: &[Interaction]) {
    for set in sets {
        if let Some(interaction) =
            interactions.iter().find(|interaction| interaction.id == set.interaction_id)
        {
            set.customer_name = Some(interaction.customer.name.clone());
            set.ride_date = Some(interaction.date.clone());
        }
    }
}

fn checkpoint_template() -> Vec<Checkpoint> {
    vec![
        Checkpoint {
            category: "Product Discussion".to_string(),
            items: vec![
                required_item("Clear product term disclosure"),
                required_item("Fee structure explanation"),
                required_item("Risk disclosure"),
            ],
        },
        Checkpoint {
            category: "Customer Protection".to_string(),
            items: vec![
                required_item("Explicit consent obtained"),
                required_item("Data privacy maintained"),
            ],
        },
    ]
}

fn required_item(text: &str) -> CheckpointItem {
    CheckpointItem { text: text.to_string(), required: true, completed: false }
}
