use rusqlite::Connection;
use trafo_core::store::Store;

use crate::record_repo::RecordRepo;
use crate::stats_repo::StatsRepo;

pub struct DbStore {
    conn: Connection,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Store for DbStore {
    type Records<'a>
        = RecordRepo<'a>
    where
        Self: 'a;
    type Stats<'a>
        = StatsRepo<'a>
    where
        Self: 'a;

    fn records(&self) -> Self::Records<'_> {
        RecordRepo::new(&self.conn)
    }

    fn stats(&self) -> Self::Stats<'_> {
        StatsRepo::new(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use chrono::{NaiveDate, NaiveDateTime};
    use trafo_core::error::RecordError;
    use trafo_core::types::{RecordFilter, RecordInput};
    use trafo_core::{Dashboard, TrafoError};
    use trafo_mirror::MirrorQueue;

    fn dashboard() -> Dashboard<DbStore> {
        Dashboard::new(DbStore::new(with_test_db().unwrap()), MirrorQueue::disabled())
    }

    fn noon(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn input(json: &str) -> RecordInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_client_total_is_ignored() {
        let dashboard = dashboard();
        let record = dashboard
            .records()
            .create_at(
                input(r#"{"prospector":"PAP801","cod100":"2","cod200":3,"cod300":null,"clandestino":1,"totalApontamentos":999}"#),
                noon(1),
            )
            .unwrap();
        assert_eq!(record.total_apontamentos, 6);
        assert_eq!(record.date, noon(1));
        let listed = dashboard.records().list(&RecordFilter::new()).unwrap();
        assert_eq!(listed[0].total_apontamentos, 6);
    }

    #[test]
    fn test_pole_is_rederived_from_agent() {
        let dashboard = dashboard();
        let record = dashboard
            .records()
            .create_at(input(r#"{"prospector":"MAB806","polo":"Tucuruí"}"#), noon(2))
            .unwrap();
        assert_eq!(record.pole, "Marabá");
        assert_eq!(record.prefix, "MAB806");
    }

    #[test]
    fn test_statistics_scenario() {
        let dashboard = dashboard();
        let records = dashboard.records();
        records
            .create_at(input(r#"{"prospector":"PAP801","visitas":90}"#), noon(3))
            .unwrap();
        records
            .create_at(input(r#"{"prospector":"PAP802","visitas":"40"}"#), noon(3))
            .unwrap();

        let stats = dashboard.stats().statistics(&RecordFilter::new()).unwrap();
        assert_eq!(stats.por_prospector.len(), 2);
        assert_eq!(stats.prospectores, ["PAP801", "PAP802"]);
        assert_eq!(stats.totais.total_visitas, 130);
        assert_eq!(stats.totais.total_prospectores, 2);
        assert_eq!(stats.totais.total_registros, 2);

        let ranking = dashboard.stats().ranking(&RecordFilter::new()).unwrap();
        assert_eq!(ranking[0].prospector, "PAP801");
        assert_eq!(ranking[0].percentual_meta, 113);
        assert_eq!(ranking[1].percentual_meta, 50);
    }

    #[test]
    fn test_huge_counters_keep_aggregates_readable() {
        let dashboard = dashboard();
        let records = dashboard.records();
        for _ in 0..2 {
            records
                .create_at(
                    input(r#"{"prospector":"PAP801","visitas":9223372036854775807}"#),
                    noon(9),
                )
                .unwrap();
        }
        let stats = dashboard.stats();
        let filter = RecordFilter::new();
        let totals = stats.statistics(&filter).unwrap().totais;
        assert_eq!(totals.total_visitas, 2 * i64::from(i32::MAX));
        assert_eq!(stats.evolution(&filter).unwrap()[0].visitas, totals.total_visitas);
        assert_eq!(stats.ranking(&filter).unwrap().len(), 1);
        assert_eq!(stats.today_at(noon(9)).unwrap().visitas, totals.total_visitas);
    }

    #[test]
    fn test_created_record_matches_listed_record() {
        let dashboard = dashboard();
        let now = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_nano_opt(12, 0, 0, 123_456_789)
            .unwrap();
        let created = dashboard
            .records()
            .create_at(input(r#"{"prospector":"PAP801","visitas":3}"#), now)
            .unwrap();
        let listed = dashboard.records().list(&RecordFilter::new()).unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[test]
    fn test_today_uses_local_day_of_now() {
        let dashboard = dashboard();
        let records = dashboard.records();
        records
            .create_at(input(r#"{"prospector":"RED801","visitas":5}"#), noon(4))
            .unwrap();
        records
            .create_at(input(r#"{"prospector":"RED801","visitas":7}"#), noon(5))
            .unwrap();
        let today = dashboard.stats().today_at(noon(5)).unwrap();
        assert_eq!(today.visitas, 7);
        assert_eq!(today.trafos, 1);
        assert_eq!(today.prospectores_ativos, 1);
    }

    #[test]
    fn test_evolution_filters_by_pole() {
        let dashboard = dashboard();
        let records = dashboard.records();
        records
            .create_at(input(r#"{"prospector":"TUC801","visitas":3}"#), noon(6))
            .unwrap();
        records
            .create_at(input(r#"{"prospector":"PAP803","visitas":9}"#), noon(6))
            .unwrap();
        let filter = RecordFilter::new().with_pole(Some("Tucuruí"));
        let evolution = dashboard.stats().evolution(&filter).unwrap();
        assert_eq!(evolution.len(), 1);
        assert_eq!(evolution[0].visitas, 3);
    }

    #[test]
    fn test_update_recomputes_and_keeps_date_when_absent() {
        let dashboard = dashboard();
        let records = dashboard.records();
        let created = records
            .create_at(input(r#"{"prospector":"PAP801","cod100":1}"#), noon(7))
            .unwrap();
        let updated = records
            .update(
                Some(created.id.as_str()),
                input(r#"{"prospector":"TUC802","cod300":4,"status":"executado","totalApontamentos":1}"#),
            )
            .unwrap();
        assert_eq!(updated.total_apontamentos, 4);
        assert_eq!(updated.pole, "Tucuruí");
        assert_eq!(updated.date, noon(7));
        assert_eq!(updated.id, created.id);
    }

    #[test]
    fn test_update_and_delete_need_an_id() {
        let dashboard = dashboard();
        let records = dashboard.records();
        assert!(matches!(
            records.delete(None),
            Err(TrafoError::Record(RecordError::MissingId))
        ));
        assert!(matches!(
            records.update(Some(""), RecordInput::default()),
            Err(TrafoError::Record(RecordError::MissingId))
        ));
        assert!(matches!(
            records.update(Some("rec_unknown"), RecordInput::default()),
            Err(TrafoError::Record(RecordError::NotFound))
        ));
        records.delete(Some("rec_unknown")).unwrap();
    }

    #[test]
    fn test_delete_then_list() {
        let dashboard = dashboard();
        let records = dashboard.records();
        let created = records
            .create_at(input(r#"{"prospector":"PAP801"}"#), noon(8))
            .unwrap();
        records.delete(Some(created.id.as_str())).unwrap();
        assert!(records.list(&RecordFilter::new()).unwrap().is_empty());
    }
}
