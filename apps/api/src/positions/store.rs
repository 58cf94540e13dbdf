use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;
use crate::hr_client::{HrApiClient, HrApiError};
use crate::models::position::{PositionId, PositionInput, PositionRecord};

/// Source of truth for positions. Swap backends without touching handlers.
///
/// Carried in `AppState` as `Arc<dyn PositionStore>`.
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Short backend name, for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<PositionRecord>, AppError>;

    async fn create(&self, input: PositionInput) -> Result<PositionRecord, AppError>;

    async fn update(
        &self,
        id: PositionId,
        input: PositionInput,
    ) -> Result<PositionRecord, AppError>;

    async fn delete(&self, id: PositionId) -> Result<(), AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RemotePositionStore — default, proxies to the HR API
// ────────────────────────────────────────────────────────────────────────────

pub struct RemotePositionStore {
    client: HrApiClient,
}

impl RemotePositionStore {
    pub fn new(client: HrApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PositionStore for RemotePositionStore {
    fn backend(&self) -> &'static str {
        "remote"
    }

    async fn list(&self) -> Result<Vec<PositionRecord>, AppError> {
        Ok(self.client.list_positions().await?)
    }

    async fn create(&self, input: PositionInput) -> Result<PositionRecord, AppError> {
        let created = self.client.create_position(&input).await?;
        info!(position_id = %created.id, "Position created");
        Ok(created)
    }

    async fn update(
        &self,
        id: PositionId,
        input: PositionInput,
    ) -> Result<PositionRecord, AppError> {
        let updated = self.client.update_position(id, &input).await?;
        info!(position_id = %id, "Position updated");
        Ok(updated)
    }

    async fn delete(&self, id: PositionId) -> Result<(), AppError> {
        self.client.delete_position(id).await?;
        info!(position_id = %id, "Position deleted");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// InMemoryPositionStore — process-local, for demos and tests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Positions {
    next_id: i64,
    records: Vec<PositionRecord>,
}

/// Keeps positions in insertion order. Deleting a superior leaves its reports
/// pointing at the missing id, the same as the HR API does.
#[derive(Default)]
pub struct InMemoryPositionStore {
    inner: RwLock<Positions>,
}

impl InMemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. Later creates get ids above the highest seeded one.
    #[allow(dead_code)]
    pub fn with_records(records: Vec<PositionRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        Self {
            inner: RwLock::new(Positions { next_id, records }),
        }
    }
}

#[async_trait]
impl PositionStore for InMemoryPositionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<PositionRecord>, AppError> {
        Ok(self.inner.read().await.records.clone())
    }

    async fn create(&self, input: PositionInput) -> Result<PositionRecord, AppError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let record = input.into_record(PositionId(inner.next_id));
        inner.records.push(record.clone());
        info!(position_id = %record.id, "Position created");
        Ok(record)
    }

    async fn update(
        &self,
        id: PositionId,
        input: PositionInput,
    ) -> Result<PositionRecord, AppError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(HrApiError::NotFound(id))?;
        *slot = input.into_record(id);
        info!(position_id = %id, "Position updated");
        Ok(slot.clone())
    }

    async fn delete(&self, id: PositionId) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        if inner.records.len() == before {
            return Err(HrApiError::NotFound(id).into());
        }
        info!(position_id = %id, "Position deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, parent: Option<i64>) -> PositionInput {
        PositionInput {
            name: name.to_string(),
            description: None,
            parent_id: parent.map(PositionId),
        }
    }

    #[tokio::test]
    async fn test_memory_store_assigns_sequential_ids() {
        let store = InMemoryPositionStore::new();
        let ceo = store.create(input("CEO", None)).await.unwrap();
        let cto = store.create(input("CTO", Some(ceo.id.0))).await.unwrap();
        assert_eq!(ceo.id, PositionId(1));
        assert_eq!(cto.id, PositionId(2));
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_store_continues_after_highest_id() {
        let store = InMemoryPositionStore::with_records(vec![PositionRecord::new(10, "CEO")]);
        let created = store.create(input("CFO", Some(10))).await.unwrap();
        assert_eq!(created.id, PositionId(11));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_position() {
        let store = InMemoryPositionStore::new();
        assert!(matches!(
            store.update(PositionId(3), input("X", None)).await,
            Err(AppError::HrApi(HrApiError::NotFound(PositionId(3))))
        ));
        assert!(matches!(
            store.delete(PositionId(3)).await,
            Err(AppError::HrApi(HrApiError::NotFound(PositionId(3))))
        ));
    }

    #[tokio::test]
    async fn test_deleting_superior_leaves_reports_dangling() {
        let store = InMemoryPositionStore::with_records(vec![
            PositionRecord::new(1, "CEO"),
            PositionRecord::new(2, "CTO").with_parent(1),
        ]);
        store.delete(PositionId(1)).await.unwrap();
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].parent_id, Some(PositionId(1)));
    }
}
