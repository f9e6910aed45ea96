use async_trait::async_trait;
use fieldkit_core::{AppResult, RecordId};
use fieldkit_domain::ModelKind;

use crate::access_predicate::AccessPredicate;

/// Storage able to evaluate row predicates itself.
#[async_trait]
pub trait ScopedRecordRepository: Send + Sync {
    /// Lists the identifiers of the rows matching the predicate, each once.
    async fn list_record_ids(
        &self,
        model: ModelKind,
        predicate: &AccessPredicate,
    ) -> AppResult<Vec<RecordId>>;

    /// Returns whether the row exists and matches the predicate.
    async fn record_matches(
        &self,
        model: ModelKind,
        record_id: RecordId,
        predicate: &AccessPredicate,
    ) -> AppResult<bool>;
}
