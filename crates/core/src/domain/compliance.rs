use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The whole compliance document: one aggregate, not a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub status: String,
    pub active_compliance_checks: Vec<CheckpointSet>,
    pub previous_compliance_checks: Vec<CheckpointSet>,
    pub guidelines: HashMap<String, Vec<String>>,
}

/// A group of checklist categories tied to one interaction.
///
/// `interaction_id` should reference an existing interaction but this
/// is not enforced: a dangling id simply never gets the
/// `customer_name`/`ride_date` overlay during enrichment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSet {
    pub interaction_id: i64,
    pub status: String,
    pub checkpoints: Vec<Checkpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub category: String,
    pub items: Vec<CheckpointItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointItem {
    pub text: String,
    pub required: bool,
    pub completed: bool,
}
