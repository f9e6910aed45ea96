use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fieldkit_application::{AccessPredicate, ScopedRecordRepository, ScopedRow};
use fieldkit_core::{AppResult, RecordId};
use fieldkit_domain::ModelKind;

type StoredRow = Arc<dyn ScopedRow + Send + Sync>;

/// In-memory entity rows evaluated with the same predicates storage receives.
#[derive(Default)]
pub struct InMemoryScopedRecordRepository {
    rows: RwLock<HashMap<ModelKind, Vec<StoredRow>>>,
}

impl InMemoryScopedRecordRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores one row of `model`.
    pub async fn insert<R>(&self, model: ModelKind, row: R)
    where
        R: ScopedRow + Send + Sync + 'static,
    {
        self.rows
            .write()
            .await
            .entry(model)
            .or_default()
            .push(Arc::new(row));
    }
}

#[async_trait]
impl ScopedRecordRepository for InMemoryScopedRecordRepository {
    async fn list_record_ids(
        &self,
        model: ModelKind,
        predicate: &AccessPredicate,
    ) -> AppResult<Vec<RecordId>> {
        let rows = self.rows.read().await;
        let mut ids: Vec<RecordId> = rows
            .get(&model)
            .into_iter()
            .flatten()
            .map(|row| &**row)
            .filter(|row| predicate.matches(*row))
            .filter_map(|row| row.row_id())
            .collect();
        ids.sort();
        ids.dedup();

        Ok(ids)
    }

    async fn record_matches(
        &self,
        model: ModelKind,
        record_id: RecordId,
        predicate: &AccessPredicate,
    ) -> AppResult<bool> {
        Ok(self.rows.read().await.get(&model).is_some_and(|rows| {
            rows.iter()
                .any(|row| row.row_id() == Some(record_id) && predicate.matches(&**row))
        }))
    }
}

#[cfg(test)]
mod tests {
    use fieldkit_application::{AccessPredicate, RowCondition, ScopedRecordRepository};
    use fieldkit_core::RecordId;
    use fieldkit_domain::{CountryId, ModelKind, Supplier};

    use super::InMemoryScopedRecordRepository;

    fn supplier(country: Option<CountryId>) -> Supplier {
        Supplier {
            id: RecordId::new(),
            country,
            area: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn rows_are_filtered_per_model() {
        let repository = InMemoryScopedRecordRepository::new();
        let country = CountryId::new();
        let inside = supplier(Some(country));
        let unknown = supplier(None);
        let outside = supplier(Some(CountryId::new()));
        for row in [inside.clone(), unknown.clone(), outside.clone()] {
            repository.insert(ModelKind::Supplier, row).await;
        }
        let covered = AccessPredicate::Condition(RowCondition::CountryCovered(country));

        let mut expected = vec![inside.id, unknown.id];
        expected.sort();
        assert!(matches!(
            repository.list_record_ids(ModelKind::Supplier, &covered).await,
            Ok(ids) if ids == expected
        ));
        assert!(matches!(
            repository.list_record_ids(ModelKind::Procurement, &AccessPredicate::All).await,
            Ok(ids) if ids.is_empty()
        ));
        assert!(matches!(
            repository.record_matches(ModelKind::Supplier, outside.id, &covered).await,
            Ok(false)
        ));
        assert!(matches!(
            repository.record_matches(ModelKind::Supplier, inside.id, &covered).await,
            Ok(true)
        ));
    }
}
