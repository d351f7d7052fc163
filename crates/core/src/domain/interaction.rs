use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::customer::{Customer, NextStep, ProductMatch};

/// A recorded ride conversation with a customer.
///
/// Ids are integers assigned as `max existing id + 1` (starting at 1)
/// and never reused. The embedded customer is a snapshot taken at
/// interaction time, not a reference into the customer collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub customer: Customer,
    pub timestamp: String,
    pub date: String,
    pub platform: String,
    /// Set to `high_potential` on creation; raw appended payloads may
    /// omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "analysisComplete")]
    pub analysis_complete: bool,
    /// Null until an analysis is submitted for this interaction.
    #[serde(rename = "conversationAnalysis")]
    pub conversation_analysis: Option<ConversationAnalysis>,
    #[serde(rename = "nextSteps")]
    pub next_steps: Vec<NextStep>,
}

/// Input for creating a new interaction. Everything else on
/// [`Interaction`] is filled in by the repository.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewInteraction {
    pub customer: Customer,
    pub timestamp: String,
    pub date: String,
    pub platform: String,
}

/// Post-call analysis attached to an interaction. Immutable once
/// attached; a re-submission replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationAnalysis {
    pub summary: Vec<String>,
    #[serde(rename = "keyTopics")]
    pub key_topics: Vec<KeyTopic>,
    pub keywords: Vec<String>,
    /// Open-ended sentiment breakdown; the shape is producer-defined.
    pub sentiment: Map<String, Value>,
    #[serde(rename = "productMatches")]
    pub product_matches: Vec<ProductMatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyTopic {
    pub topic: String,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::interaction::Interaction;

    #[test]
    fn pending_analysis_serializes_as_null() {
        let interaction: Interaction = serde_json::from_value(json!({
            "id": 1,
            "customer": {
                "phone_number": "+911234567890",
                "name": "Ava",
                "businessInsights": {
                    "segment": "affluent",
                    "age": 42,
                    "aum": 1_250_000.0,
                    "industry": "retail",
                    "status": "active"
                },
                "financialGoals": []
            },
            "timestamp": "2024-01-01T09:30:00Z",
            "date": "2024-01-01",
            "platform": "whatsapp",
            "analysisComplete": false,
            "conversationAnalysis": null,
            "nextSteps": []
        }))
        .expect("interaction should deserialize");

        assert!(interaction.conversation_analysis.is_none());
        assert!(interaction.status.is_none());

        let encoded = serde_json::to_value(&interaction).expect("interaction should serialize");
        assert!(encoded["conversationAnalysis"].is_null());
        // Absent status stays absent rather than becoming an explicit null.
        assert!(encoded.get("status").is_none());
    }
}
