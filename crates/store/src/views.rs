use serde_json::Value;

use crate::document::{Collection, DocumentStore};
use crate::repositories::RepositoryError;

/// Read-only passthrough views.
///
/// Dashboard metrics and the product catalog are precomputed documents;
/// nothing here inspects or transforms them, they just share the
/// whole-document access contract of the repositories.
#[derive(Clone)]
pub struct ViewComposer {
    store: DocumentStore,
}

impl ViewComposer {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn dashboard(&self) -> Result<Value, RepositoryError> {
        Ok(self.store.load(Collection::Dashboard).await?)
    }

    pub async fn products(&self) -> Result<Value, RepositoryError> {
        Ok(self.store.load(Collection::Products).await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use crate::document::{Collection, DocumentStore};
    use crate::views::ViewComposer;

    #[tokio::test]
    async fn stored_documents_pass_through_unchanged() {
        let dir = TempDir::new().expect("temp dir");
        let store = DocumentStore::new(dir.path());

        let dashboard = json!({
            "conversationMetrics": {},
            "topTriggerWords": [],
            "sentimentTrend": [],
            "productRecommendations": [],
            "customerSegments": []
        });
        let products = json!([{"name": "Balanced Fund", "category": "mutual_fund"}]);
        store.save(Collection::Dashboard, &dashboard).await.expect("seed dashboard");
        store.save(Collection::Products, &products).await.expect("seed products");

        let views = ViewComposer::new(store);
        assert_eq!(views.dashboard().await.expect("dashboard"), dashboard);
        assert_eq!(views.products().await.expect("products"), products);
    }
}
