use crate::error::{RecordError, TrafoError};
use crate::normalize::{draft_from_input, sheet_row};
use crate::records::RecordRepository;
use crate::stats::{StatsRepository, build_ranking};
use crate::store::Store;
use crate::types::{
    DailyRollup, RankingEntry, Record, RecordFilter, RecordId, RecordInput, Statistics,
    TodaySnapshot, day_window,
};
use chrono::{Local, NaiveDateTime};
use trafo_mirror::MirrorQueue;

pub struct Dashboard<S: Store> {
    store: S,
    mirror: MirrorQueue,
}

impl<S: Store> Dashboard<S> {
    pub fn new(store: S, mirror: MirrorQueue) -> Self {
        Self { store, mirror }
    }

    pub fn records(&self) -> RecordsApi<'_, S> {
        RecordsApi { core: self }
    }

    pub fn stats(&self) -> StatsApi<'_, S> {
        StatsApi { core: self }
    }
}

pub struct RecordsApi<'a, S: Store> {
    core: &'a Dashboard<S>,
}

impl<'a, S: Store> RecordsApi<'a, S> {
    /// Stores a record stamped with the current local time when the payload has no date.
    pub fn create(&self, input: RecordInput) -> Result<Record, TrafoError> {
        self.create_at(input, Local::now().naive_local())
    }

    pub fn create_at(&self, input: RecordInput, now: NaiveDateTime) -> Result<Record, TrafoError> {
        let draft = draft_from_input(input, now);
        let record = self.core.store.records().create(draft)?;
        tracing::info!(
            record_id = %record.id,
            prospector = %record.agent_code,
            visitas = record.visits,
            "record created"
        );
        // Never blocks; a full or disabled queue drops the row.
        self.core.mirror.enqueue(sheet_row(&record));
        Ok(record)
    }

    pub fn list(&self, filter: &RecordFilter) -> Result<Vec<Record>, TrafoError> {
        Ok(self.core.store.records().list(filter)?)
    }

    /// Full edit-replace; keeps id and creation time.
    pub fn update(&self, id: Option<&str>, input: RecordInput) -> Result<Record, TrafoError> {
        let id = require_id(id)?;
        let records = self.core.store.records();
        let Some(existing) = records.get(&id)? else {
            return Err(TrafoError::Record(RecordError::NotFound));
        };
        let draft = draft_from_input(input, existing.date);
        let record = records.replace(&id, draft)?;
        tracing::info!(record_id = %record.id, "record updated");
        Ok(record)
    }

    pub fn delete(&self, id: Option<&str>) -> Result<(), TrafoError> {
        let id = require_id(id)?;
        self.core.store.records().delete(&id)?;
        tracing::info!(record_id = %id, "record deleted");
        Ok(())
    }
}

fn require_id(raw: Option<&str>) -> Result<RecordId, RecordError> {
    raw.and_then(|value| RecordId::new(value).ok())
        .ok_or(RecordError::MissingId)
}

pub struct StatsApi<'a, S: Store> {
    core: &'a Dashboard<S>,
}

impl<'a, S: Store> StatsApi<'a, S> {
    pub fn statistics(&self, filter: &RecordFilter) -> Result<Statistics, TrafoError> {
        let stats = self.core.store.stats();
        let por_prospector = stats.by_agent(filter)?;
        let prospectores = stats.agents(filter)?;
        let totais = stats.totals(filter)?;
        Ok(Statistics {
            por_prospector,
            prospectores,
            totais,
        })
    }

    pub fn evolution(&self, filter: &RecordFilter) -> Result<Vec<DailyRollup>, TrafoError> {
        Ok(self.core.store.stats().daily(filter)?)
    }

    pub fn today(&self) -> Result<TodaySnapshot, TrafoError> {
        self.today_at(Local::now().naive_local())
    }

    /// Snapshot of the calendar day containing `now`.
    pub fn today_at(&self, now: NaiveDateTime) -> Result<TodaySnapshot, TrafoError> {
        let (start, end) = day_window(now.date());
        Ok(self.core.store.stats().window(start, end)?)
    }

    pub fn ranking(&self, filter: &RecordFilter) -> Result<Vec<RankingEntry>, TrafoError> {
        let summaries = self.core.store.stats().by_agent(filter)?;
        Ok(build_ranking(summaries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_missing() {
        assert!(matches!(require_id(None), Err(RecordError::MissingId)));
        assert!(matches!(require_id(Some("  ")), Err(RecordError::MissingId)));
        assert_eq!(require_id(Some("rec_1")).unwrap().as_str(), "rec_1");
    }
}
