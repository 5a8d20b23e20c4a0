use crate::error::RecordError;
use crate::types::{Record, RecordDraft, RecordFilter, RecordId};

pub trait RecordRepository {
    /// Persists a new record; the repository assigns the id and timestamps.
    fn create(&self, draft: RecordDraft) -> Result<Record, RecordError>;
    fn get(&self, id: &RecordId) -> Result<Option<Record>, RecordError>;
    /// Newest first by creation time.
    fn list(&self, filter: &RecordFilter) -> Result<Vec<Record>, RecordError>;
    fn replace(&self, id: &RecordId, draft: RecordDraft) -> Result<Record, RecordError>;
    /// Succeeds whether or not the row existed.
    fn delete(&self, id: &RecordId) -> Result<(), RecordError>;
}
