use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use ridecrm_store::{Collection, DocumentStore};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone)]
pub struct HealthState {
    store: DocumentStore,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub storage: HealthCheck,
    pub checked_at: String,
}

pub fn router(store: DocumentStore) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { store })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = storage_check(&state.store).await;
    let ready = storage.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "ridecrm-server runtime initialized".to_string(),
        },
        storage,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn storage_check(store: &DocumentStore) -> HealthCheck {
    match store.load::<Value>(Collection::Customers).await {
        Ok(_) => HealthCheck {
            status: "ready",
            detail: "customer collection is readable".to_string(),
        },
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("customer collection read failed: {error}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};
    use ridecrm_store::{Collection, DocumentStore};
    use tempfile::TempDir;

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_when_storage_is_readable() {
        let dir = TempDir::new().expect("temp dir");
        let store = DocumentStore::new(dir.path());
        store
            .save(Collection::Customers, &serde_json::json!([]))
            .await
            .expect("seed customers");

        let (status, Json(payload)) = health(State(HealthState { store })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.storage.status, "ready");
    }

    #[tokio::test]
    async fn health_degrades_when_the_collection_is_missing() {
        let dir = TempDir::new().expect("temp dir");
        let store = DocumentStore::new(dir.path());

        let (status, Json(payload)) = health(State(HealthState { store })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.storage.status, "degraded");
    }
}
