//! JSON API routes over the document repositories.
//!
//! Endpoints:
//! - `GET  /customers`                          — list all customers
//! - `POST /customers`                          — create or overwrite a customer by phone number
//! - `GET  /customers/{phone}`                  — fetch one customer
//! - `GET  /customers/{phone}/interactions`     — interactions for one customer (404 when none)
//! - `POST /customers/{phone}/interactions`     — append a fully-formed interaction record
//! - `GET  /interactions`                       — list all interactions
//! - `POST /interactions`                       — record an interaction and open its compliance review
//! - `POST /interactions/{id}/analysis`         — attach the post-call analysis
//! - `GET  /compliance/current-ride`            — compliance aggregate, enriched with interaction data
//! - `POST /compliance/current-ride`            — replace the compliance aggregate
//! - `GET  /products`                           — product catalog passthrough
//! - `GET  /analytics/dashboard`                — dashboard metrics passthrough
//!
//! Each endpoint maps onto exactly one repository or view operation.
//! Request bodies are typed: a missing required field is rejected by
//! the JSON extractor before any mutation is attempted.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use ridecrm_core::domain::compliance::ComplianceCheck;
use ridecrm_core::domain::customer::Customer;
use ridecrm_core::domain::interaction::{ConversationAnalysis, Interaction, NewInteraction};
use ridecrm_store::{
    ComplianceRepository, CustomerRepository, InteractionRepository, RepositoryError, ViewComposer,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct ApiState {
    pub customers: CustomerRepository,
    pub interactions: InteractionRepository,
    pub compliance: ComplianceRepository,
    pub views: ViewComposer,
}

/// Error body shape the dashboard frontend expects: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/customers", get(list_customers).post(upsert_customer))
        .route("/customers/{phone_number}", get(get_customer))
        .route(
            "/customers/{phone_number}/interactions",
            get(list_customer_interactions).post(append_customer_interaction),
        )
        .route("/interactions", get(list_interactions).post(create_interaction))
        .route("/interactions/{id}/analysis", post(attach_analysis))
        .route("/compliance/current-ride", get(get_compliance).post(replace_compliance))
        .route("/products", get(list_products))
        .route("/analytics/dashboard", get(get_dashboard))
        // The dashboard frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn repository_failure(err: RepositoryError) -> (StatusCode, Json<ApiError>) {
    match err {
        RepositoryError::NotFound(message) => {
            (StatusCode::NOT_FOUND, Json(ApiError { detail: message }))
        }
        RepositoryError::Store(source) => {
            error!(
                event_name = "api.storage_failure",
                error = %source,
                "document store failure while serving a request"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError { detail: "storage failure".to_string() }),
            )
        }
    }
}

async fn list_customers(State(state): State<ApiState>) -> ApiResult<Vec<Customer>> {
    state.customers.list().await.map(Json).map_err(repository_failure)
}

async fn get_customer(
    State(state): State<ApiState>,
    Path(phone_number): Path<String>,
) -> ApiResult<Customer> {
    state.customers.get(&phone_number).await.map(Json).map_err(repository_failure)
}

async fn upsert_customer(
    State(state): State<ApiState>,
    Json(customer): Json<Customer>,
) -> ApiResult<Customer> {
    let stored = state.customers.upsert(customer).await.map_err(repository_failure)?;
    info!(
        event_name = "api.customer.upserted",
        phone_number = %stored.phone_number,
        "customer record stored"
    );
    Ok(Json(stored))
}

async fn list_interactions(State(state): State<ApiState>) -> ApiResult<Vec<Interaction>> {
    state.interactions.list().await.map(Json).map_err(repository_failure)
}

async fn create_interaction(
    State(state): State<ApiState>,
    Json(request): Json<NewInteraction>,
) -> ApiResult<Interaction> {
    let interaction = state.interactions.create(request).await.map_err(repository_failure)?;
    info!(
        event_name = "api.interaction.created",
        interaction_id = interaction.id,
        "interaction recorded with a pending compliance review"
    );
    Ok(Json(interaction))
}

async fn attach_analysis(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(analysis): Json<ConversationAnalysis>,
) -> ApiResult<MessageResponse> {
    state.interactions.attach_analysis(id, analysis).await.map_err(repository_failure)?;
    info!(event_name = "api.interaction.analysis_attached", interaction_id = id, "analysis stored");
    Ok(Json(MessageResponse { message: "Analysis saved successfully".to_string() }))
}

async fn list_customer_interactions(
    State(state): State<ApiState>,
    Path(phone_number): Path<String>,
) -> ApiResult<Vec<Interaction>> {
    state.interactions.list_by_customer(&phone_number).await.map(Json).map_err(repository_failure)
}

/// Raw append path: the record is stored as supplied, except that the
/// path's phone number always wins over the one in the payload.
async fn append_customer_interaction(
    State(state): State<ApiState>,
    Path(phone_number): Path<String>,
    Json(mut interaction): Json<Interaction>,
) -> ApiResult<Interaction> {
    interaction.customer.phone_number = phone_number;
    let stored = state.interactions.append(interaction).await.map_err(repository_failure)?;
    info!(
        event_name = "api.interaction.appended",
        interaction_id = stored.id,
        phone_number = %stored.customer.phone_number,
        "raw interaction appended"
    );
    Ok(Json(stored))
}

async fn get_compliance(State(state): State<ApiState>) -> ApiResult<ComplianceCheck> {
    state.compliance.get_enriched().await.map(Json).map_err(repository_failure)
}

async fn replace_compliance(
    State(state): State<ApiState>,
    Json(compliance): Json<ComplianceCheck>,
) -> ApiResult<ComplianceCheck> {
    let stored = state.compliance.replace(compliance).await.map_err(repository_failure)?;
    info!(event_name = "api.compliance.replaced", "compliance aggregate replaced");
    Ok(Json(stored))
}

async fn list_products(State(state): State<ApiState>) -> ApiResult<Value> {
    state.views.products().await.map(Json).map_err(repository_failure)
}

async fn get_dashboard(State(state): State<ApiState>) -> ApiResult<Value> {
    state.views.dashboard().await.map(Json).map_err(repository_failure)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::body::Body;
    use axum::extract::{Path, State};
    use axum::http::{Request, StatusCode};
    use axum::Json;
    use ridecrm_core::domain::compliance::ComplianceCheck;
    use ridecrm_core::domain::customer::{BusinessInsights, Customer};
    use ridecrm_core::domain::interaction::{Interaction, NewInteraction};
    use ridecrm_store::{
        Collection, ComplianceRepository, CustomerRepository, DocumentStore,
        InteractionRepository, ViewComposer,
    };
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::api::{
        append_customer_interaction, attach_analysis, create_interaction, get_compliance,
        get_customer, router, upsert_customer, ApiState,
    };

    async fn setup() -> (TempDir, ApiState) {
        let dir = TempDir::new().expect("temp dir");
        let store = DocumentStore::new(dir.path());

        store.save(Collection::Customers, &Vec::<Customer>::new()).await.expect("seed customers");
        store
            .save(Collection::Interactions, &Vec::<Interaction>::new())
            .await
            .expect("seed interactions");
        store
            .save(
                Collection::Compliance,
                &ComplianceCheck {
                    status: "in_review".to_string(),
                    active_compliance_checks: Vec::new(),
                    previous_compliance_checks: Vec::new(),
                    guidelines: HashMap::new(),
                },
            )
            .await
            .expect("seed compliance");
        store.save(Collection::Products, &json!([])).await.expect("seed products");
        store
            .save(
                Collection::Dashboard,
                &json!({
                    "conversationMetrics": {},
                    "topTriggerWords": [],
                    "sentimentTrend": [],
                    "productRecommendations": [],
                    "customerSegments": []
                }),
            )
            .await
            .expect("seed dashboard");

        let compliance = ComplianceRepository::new(store.clone());
        let state = ApiState {
            customers: CustomerRepository::new(store.clone()),
            interactions: InteractionRepository::new(store.clone(), compliance.clone()),
            compliance,
            views: ViewComposer::new(store),
        };
        (dir, state)
    }

    fn customer(phone_number: &str, name: &str) -> Customer {
        Customer {
            phone_number: phone_number.to_string(),
            name: name.to_string(),
            business_insights: BusinessInsights {
                segment: "affluent".to_string(),
                age: 42,
                aum: 1_250_000.0,
                industry: "retail".to_string(),
                status: "active".to_string(),
            },
            financial_goals: vec!["retirement".to_string()],
            nbo: Vec::new(),
            nba: Vec::new(),
        }
    }

    fn new_interaction(phone_number: &str, name: &str) -> NewInteraction {
        NewInteraction {
            customer: customer(phone_number, name),
            timestamp: "2024-01-01T09:30:00Z".to_string(),
            date: "2024-01-01".to_string(),
            platform: "whatsapp".to_string(),
        }
    }

    #[tokio::test]
    async fn unknown_customer_is_a_404_with_a_message() {
        let (_dir, state) = setup().await;

        let result = get_customer(State(state), Path("missing-phone".to_string())).await;

        let (status, Json(body)) = result.expect_err("missing customer should fail");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.detail, "Customer not found");
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips_the_customer() {
        let (_dir, state) = setup().await;
        let ava = customer("+911234567890", "Ava");

        upsert_customer(State(state.clone()), Json(ava.clone())).await.expect("upsert");
        let Json(stored) = get_customer(State(state), Path("+911234567890".to_string()))
            .await
            .expect("get");

        assert_eq!(stored, ava);
    }

    #[tokio::test]
    async fn create_interaction_opens_the_paired_review() {
        let (_dir, state) = setup().await;

        let Json(created) =
            create_interaction(State(state.clone()), Json(new_interaction("+911111111111", "Ava")))
                .await
                .expect("create");
        assert_eq!(created.id, 1);
        assert_eq!(created.status.as_deref(), Some("high_potential"));

        let Json(compliance) = get_compliance(State(state)).await.expect("compliance");
        assert_eq!(compliance.active_compliance_checks.len(), 1);
        assert_eq!(compliance.active_compliance_checks[0].interaction_id, 1);
    }

    #[tokio::test]
    async fn attach_analysis_on_a_missing_interaction_is_a_404() {
        let (_dir, state) = setup().await;
        let analysis = serde_json::from_value(json!({
            "summary": ["call went well"],
            "keyTopics": [],
            "keywords": [],
            "sentiment": {},
            "productMatches": []
        }))
        .expect("analysis payload");

        let result = attach_analysis(State(state), Path(42), Json(analysis)).await;

        let (status, Json(body)) = result.expect_err("missing id should fail");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.detail, "Interaction not found");
    }

    #[tokio::test]
    async fn appended_interaction_takes_the_path_phone_number() {
        let (_dir, state) = setup().await;
        let raw = Interaction {
            id: 9,
            customer: customer("+919999999999", "Ava"),
            timestamp: "2024-01-01T09:30:00Z".to_string(),
            date: "2024-01-01".to_string(),
            platform: "phone".to_string(),
            status: None,
            analysis_complete: false,
            conversation_analysis: None,
            next_steps: Vec::new(),
        };

        let Json(stored) = append_customer_interaction(
            State(state.clone()),
            Path("+911111111111".to_string()),
            Json(raw),
        )
        .await
        .expect("append");

        assert_eq!(stored.customer.phone_number, "+911111111111");
        let Json(compliance) = get_compliance(State(state)).await.expect("compliance");
        assert!(compliance.active_compliance_checks.is_empty());
    }

    #[tokio::test]
    async fn router_serves_the_seeded_collections() {
        let (_dir, state) = setup().await;
        let app = router(state);

        for uri in ["/customers", "/interactions", "/products", "/analytics/dashboard"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        }
    }

    #[tokio::test]
    async fn not_found_bodies_use_the_detail_key() {
        let (_dir, state) = setup().await;
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/customers/missing-phone")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body, json!({"detail": "Customer not found"}));
    }

    #[tokio::test]
    async fn router_rejects_a_customer_body_missing_required_fields() {
        let (_dir, state) = setup().await;
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/customers")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"phone_number": "+911234567890"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
