use serde::{Deserialize, Serialize};

/// A customer record keyed by phone number.
///
/// The phone number is the natural key: at most one record per number
/// exists in the stored collection, and upserts replace the whole field
/// set of the matching record. Field names follow the stored documents,
/// which mix snake_case and camelCase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub phone_number: String,
    pub name: String,
    #[serde(rename = "businessInsights")]
    pub business_insights: BusinessInsights,
    #[serde(rename = "financialGoals")]
    pub financial_goals: Vec<String>,
    /// Next-best-offer: ranked product recommendations.
    #[serde(default)]
    pub nbo: Vec<ProductMatch>,
    /// Next-best-action: ranked follow-up suggestions.
    #[serde(default)]
    pub nba: Vec<NextStep>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessInsights {
    pub segment: String,
    pub age: u32,
    pub aum: f64,
    pub industry: String,
    pub status: String,
}

/// A product recommendation with supporting rationale. Confidence is
/// expected in 0.0..=1.0 but not validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub product: String,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    pub action: String,
    pub priority: String,
    /// Calendar date string, `YYYY-MM-DD`.
    pub deadline: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::customer::Customer;

    #[test]
    fn nbo_and_nba_default_to_empty_when_absent() {
        let customer: Customer = serde_json::from_value(json!({
            "phone_number": "+911234567890",
            "name": "Ava",
            "businessInsights": {
                "segment": "affluent",
                "age": 42,
                "aum": 1_250_000.0,
                "industry": "retail",
                "status": "active"
            },
            "financialGoals": ["retirement"]
        }))
        .expect("customer should deserialize without nbo/nba");

        assert!(customer.nbo.is_empty());
        assert!(customer.nba.is_empty());
    }

    #[test]
    fn stored_field_names_use_the_document_casing() {
        let customer: Customer = serde_json::from_value(json!({
            "phone_number": "+911234567890",
            "name": "Ava",
            "businessInsights": {
                "segment": "affluent",
                "age": 42,
                "aum": 1_250_000.0,
                "industry": "retail",
                "status": "active"
            },
            "financialGoals": ["retirement"]
        }))
        .expect("customer should deserialize");

        let encoded = serde_json::to_value(&customer).expect("customer should serialize");
        assert!(encoded.get("businessInsights").is_some());
        assert!(encoded.get("financialGoals").is_some());
        assert!(encoded.get("business_insights").is_none());
    }
}
