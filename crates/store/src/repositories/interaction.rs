use chrono::{Duration, Utc};

use ridecrm_core::domain::customer::NextStep;
use ridecrm_core::domain::interaction::{ConversationAnalysis, Interaction, NewInteraction};

use super::{ComplianceRepository, RepositoryError};
use crate::document::{Collection, DocumentStore};

const CREATED_STATUS: &str = "high_potential";
const FOLLOW_UP_DEADLINE_DAYS: i64 = 3;

#[derive(Clone)]
pub struct InteractionRepository {
    store: DocumentStore,
    /// Every interaction created through [`create`](Self::create) must
    /// open a paired compliance review, so the repository owns the
    /// collaborator instead of leaving the pairing to callers.
    compliance: ComplianceRepository,
}

impl InteractionRepository {
    pub fn new(store: DocumentStore, compliance: ComplianceRepository) -> Self {
        Self { store, compliance }
    }

    pub async fn list(&self) -> Result<Vec<Interaction>, RepositoryError> {
        Ok(self.store.load(Collection::Interactions).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Interaction, RepositoryError> {
        let interactions: Vec<Interaction> = self.store.load(Collection::Interactions).await?;

        interactions
            .into_iter()
            .find(|interaction| interaction.id == id)
            .ok_or_else(|| RepositoryError::NotFound("Interaction not found".to_string()))
    }

    /// Interactions whose embedded customer has this phone number.
    ///
    /// An empty result is a NotFound error, not a success: callers must
    /// be able to tell "no matches" apart from a populated answer.
    pub async fn list_by_customer(
        &self,
        phone_number: &str,
    ) -> Result<Vec<Interaction>, RepositoryError> {
        let interactions: Vec<Interaction> = self.store.load(Collection::Interactions).await?;

        let matches: Vec<Interaction> = interactions
            .into_iter()
            .filter(|interaction| interaction.customer.phone_number == phone_number)
            .collect();

        if matches.is_empty() {
            return Err(RepositoryError::NotFound("No interactions found".to_string()));
        }
        Ok(matches)
    }

    /// Record a new interaction and open its compliance review.
    ///
    /// The id is `max existing id + 1` (1 on an empty collection) and is
    /// never reused. The record starts with a single pending follow-up
    /// step due three days out. The compliance write happens after the
    /// interaction write has committed; a failure there leaves the
    /// interaction stored without its review (no cross-collection
    /// atomicity).
    pub async fn create(&self, request: NewInteraction) -> Result<Interaction, RepositoryError> {
        let interaction = {
            let _guard = self.store.gate(Collection::Interactions).lock().await;

            let mut interactions: Vec<Interaction> =
                self.store.load(Collection::Interactions).await?;
            let next_id =
                interactions.iter().map(|interaction| interaction.id).max().unwrap_or(0) + 1;

            let interaction = Interaction {
                id: next_id,
                customer: request.customer,
                timestamp: request.timestamp,
                date: request.date,
                platform: request.platform,
                status: Some(CREATED_STATUS.to_string()),
                analysis_complete: false,
                conversation_analysis: None,
                next_steps: vec![default_follow_up()],
            };

            interactions.push(interaction.clone());
            self.store.save(Collection::Interactions, &interactions).await?;
            interaction
        };

        self.compliance
            .create_checkpoint_set(interaction.id, &interaction.customer.name, &interaction.date)
            .await?;

        Ok(interaction)
    }

    /// Attach (or re-attach) the post-call analysis. Overwrites any
    /// prior analysis; everything else on the record stays unchanged.
    pub async fn attach_analysis(
        &self,
        id: i64,
        analysis: ConversationAnalysis,
    ) -> Result<(), RepositoryError> {
        let _guard = self.store.gate(Collection::Interactions).lock().await;

        let mut interactions: Vec<Interaction> = self.store.load(Collection::Interactions).await?;
        let interaction = interactions
            .iter_mut()
            .find(|interaction| interaction.id == id)
            .ok_or_else(|| RepositoryError::NotFound("Interaction not found".to_string()))?;

        interaction.conversation_analysis = Some(analysis);
        interaction.analysis_complete = true;

        self.store.save(Collection::Interactions, &interactions).await?;
        Ok(())
    }

    /// Store a fully-formed record as-is: no id assignment and no
    /// compliance pairing, unlike [`create`](Self::create). The two
    /// entry points are deliberately kept distinct.
    pub async fn append(&self, interaction: Interaction) -> Result<Interaction, RepositoryError> {
        let _guard = self.store.gate(Collection::Interactions).lock().await;

        let mut interactions: Vec<Interaction> = self.store.load(Collection::Interactions).await?;
        interactions.push(interaction.clone());

        self.store.save(Collection::Interactions, &interactions).await?;
        Ok(interaction)
    }
}

fn default_follow_up() -> NextStep {
    let deadline = (Utc::now() + Duration::days(FOLLOW_UP_DEADLINE_DAYS))
        .format("%Y-%m-%d")
        .to_string();
    NextStep {
        action: "Follow up call".to_string(),
        priority: "high".to_string(),
        deadline,
        status: "pending".to_string(),
    }
}
