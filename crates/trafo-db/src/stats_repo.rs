use crate::query::WhereClause;
use crate::util::{coerce_count, encode_business_date};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use trafo_core::error::StatsError;
use trafo_core::stats::StatsRepository;
use trafo_core::types::{AgentSummary, DailyRollup, RecordFilter, Totals, TodaySnapshot};

const SUM_COLUMNS: &str = "COALESCE(SUM(visitas), 0), COALESCE(SUM(total_apontamentos), 0), COALESCE(SUM(cod100), 0), COALESCE(SUM(cod200), 0), COALESCE(SUM(cod300), 0), COALESCE(SUM(clandestino), 0), COALESCE(SUM(inclusao), 0), COALESCE(SUM(exclusao), 0)";

pub struct StatsRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> StatsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn collect<T>(
        &self,
        sql: &str,
        params: &[Value],
        map: impl Fn(&rusqlite::Row<'_>) -> Result<T, StatsError>,
    ) -> Result<Vec<T>, StatsError> {
        let mut stmt = self.conn.prepare(sql).map_err(storage)?;
        let mut rows = stmt.query(params_from_iter(params)).map_err(storage)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(storage)? {
            out.push(map(row)?);
        }
        Ok(out)
    }
}

impl<'a> StatsRepository for StatsRepo<'a> {
    fn by_agent(&self, filter: &RecordFilter) -> Result<Vec<AgentSummary>, StatsError> {
        let clause = WhereClause::from_filter(filter);
        let sql = format!(
            "SELECT prospector, {SUM_COLUMNS}, COUNT(*) FROM registros{} GROUP BY prospector ORDER BY prospector ASC",
            clause.sql()
        );
        self.collect(&sql, clause.params(), |row| {
            Ok(AgentSummary {
                prospector: row.get::<_, Option<String>>(0).map_err(storage)?.unwrap_or_default(),
                total_visitas: count(row, 1)?,
                total_apontamentos: count(row, 2)?,
                cod100: count(row, 3)?,
                cod200: count(row, 4)?,
                cod300: count(row, 5)?,
                clandestino: count(row, 6)?,
                inclusao: count(row, 7)?,
                exclusao: count(row, 8)?,
                registros: count(row, 9)?,
            })
        })
    }

    fn agents(&self, filter: &RecordFilter) -> Result<Vec<String>, StatsError> {
        let clause = WhereClause::from_filter(filter);
        let sql = format!(
            "SELECT DISTINCT prospector FROM registros{} ORDER BY prospector ASC",
            clause.sql()
        );
        self.collect(&sql, clause.params(), |row| {
            Ok(row.get::<_, Option<String>>(0).map_err(storage)?.unwrap_or_default())
        })
    }

    fn totals(&self, filter: &RecordFilter) -> Result<Totals, StatsError> {
        let clause = WhereClause::from_filter(filter);
        let sql = format!(
            "SELECT {SUM_COLUMNS}, COUNT(*), COUNT(DISTINCT prospector) FROM registros{}",
            clause.sql()
        );
        let mut totals = self.collect(&sql, clause.params(), |row| {
            Ok(Totals {
                total_visitas: count(row, 0)?,
                total_apontamentos: count(row, 1)?,
                cod100: count(row, 2)?,
                cod200: count(row, 3)?,
                cod300: count(row, 4)?,
                clandestino: count(row, 5)?,
                inclusao: count(row, 6)?,
                exclusao: count(row, 7)?,
                total_registros: count(row, 8)?,
                total_prospectores: count(row, 9)?,
            })
        })?;
        Ok(totals.pop().unwrap_or_default())
    }

    fn daily(&self, filter: &RecordFilter) -> Result<Vec<DailyRollup>, StatsError> {
        let clause = WhereClause::from_filter(filter);
        let sql = format!(
            "SELECT substr(data, 1, 10) AS dia, COALESCE(SUM(visitas), 0), COALESCE(SUM(total_apontamentos), 0), COUNT(DISTINCT prospector) FROM registros{} GROUP BY dia ORDER BY dia ASC",
            clause.sql()
        );
        self.collect(&sql, clause.params(), |row| {
            let day: String = row.get(0).map_err(storage)?;
            let data = NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|_| {
                StatsError::Storage {
                    message: format!("invalid stored date: {day}"),
                }
            })?;
            Ok(DailyRollup {
                data,
                visitas: count(row, 1)?,
                apontamentos: count(row, 2)?,
                prospectores: count(row, 3)?,
            })
        })
    }

    fn window(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<TodaySnapshot, StatsError> {
        let mut clause = WhereClause::new();
        clause.push("data", ">=", encode_business_date(&start));
        clause.push("data", "<", encode_business_date(&end));
        let sql = format!(
            "SELECT COALESCE(SUM(visitas), 0), COALESCE(SUM(total_apontamentos), 0), COUNT(DISTINCT prospector), COUNT(*) FROM registros{}",
            clause.sql()
        );
        let mut snapshot = self.collect(&sql, clause.params(), |row| {
            Ok(TodaySnapshot {
                visitas: count(row, 0)?,
                apontamentos: count(row, 1)?,
                prospectores_ativos: count(row, 2)?,
                trafos: count(row, 3)?,
            })
        })?;
        Ok(snapshot.pop().unwrap_or_default())
    }
}

fn count(row: &rusqlite::Row<'_>, index: usize) -> Result<i64, StatsError> {
    let value: Value = row.get(index).map_err(storage)?;
    Ok(coerce_count(value))
}

fn storage(err: impl std::fmt::Display) -> StatsError {
    StatsError::Storage {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_repo::RecordRepo;
    use crate::schema::with_test_db;
    use trafo_core::normalize::draft_from_input;
    use trafo_core::records::RecordRepository;
    use trafo_core::types::{RecordInput, day_window};

    fn at(day: u32, h: u32, min: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, day)
            .unwrap()
            .and_hms_micro_opt(h, min, s, micro)
            .unwrap()
    }

    fn sum_of(summaries: &[AgentSummary]) -> Totals {
        summaries.iter().fold(Totals::default(), |acc, s| Totals {
            total_visitas: acc.total_visitas + s.total_visitas,
            total_apontamentos: acc.total_apontamentos + s.total_apontamentos,
            cod100: acc.cod100 + s.cod100,
            cod200: acc.cod200 + s.cod200,
            cod300: acc.cod300 + s.cod300,
            clandestino: acc.clandestino + s.clandestino,
            inclusao: acc.inclusao + s.inclusao,
            exclusao: acc.exclusao + s.exclusao,
            total_registros: acc.total_registros + s.registros,
            total_prospectores: acc.total_prospectores + 1,
        })
    }

    fn seed(conn: &Connection, agent: &str, date: NaiveDateTime, visits: i64, codes: [i64; 4]) {
        let input = RecordInput {
            agent_code: Some(agent.to_string()),
            date: Some(date),
            visits,
            code100: codes[0],
            code200: codes[1],
            code300: codes[2],
            clandestine: codes[3],
            inclusions: 1,
            ..RecordInput::default()
        };
        RecordRepo::new(conn)
            .create(draft_from_input(input, date))
            .unwrap();
    }

    #[test]
    fn test_two_agents_scenario() {
        let conn = with_test_db().unwrap();
        seed(&conn, "PAP801", at(10, 9, 0, 0, 0), 90, [1, 0, 0, 0]);
        seed(&conn, "PAP802", at(10, 11, 0, 0, 0), 40, [0, 2, 0, 1]);
        let stats = StatsRepo::new(&conn);
        let filter = RecordFilter::new();

        let by_agent = stats.by_agent(&filter).unwrap();
        let codes: Vec<_> = by_agent.iter().map(|s| s.prospector.as_str()).collect();
        assert_eq!(codes, ["PAP801", "PAP802"]);
        assert_eq!(stats.agents(&filter).unwrap(), ["PAP801", "PAP802"]);

        let totals = stats.totals(&filter).unwrap();
        assert_eq!(totals.total_visitas, 130);
        assert_eq!(totals.total_prospectores, 2);
        assert_eq!(totals.total_apontamentos, 4);
        assert_eq!(totals.inclusao, 2);
    }

    #[test]
    fn test_totals_match_sum_of_agents() {
        let conn = with_test_db().unwrap();
        seed(&conn, "MAB803", at(1, 8, 0, 0, 0), 12, [1, 2, 3, 4]);
        seed(&conn, "MAB803", at(2, 8, 0, 0, 0), 30, [0, 0, 1, 0]);
        seed(&conn, "TUC801", at(2, 9, 0, 0, 0), 81, [5, 0, 0, 2]);
        seed(&conn, "RED801", at(5, 9, 0, 0, 0), 7, [0, 0, 0, 0]);
        let stats = StatsRepo::new(&conn);

        let filters = [
            RecordFilter::new(),
            RecordFilter::new()
                .with_start_date(NaiveDate::from_ymd_opt(2026, 4, 2))
                .with_end_date(NaiveDate::from_ymd_opt(2026, 4, 2)),
            RecordFilter::new().with_agent_code(Some("MAB803")),
            RecordFilter::new().with_pole(Some("Nowhere")),
        ];
        for filter in &filters {
            let summed = sum_of(&stats.by_agent(filter).unwrap());
            assert_eq!(stats.totals(filter).unwrap(), summed, "filter {filter:?}");
        }
    }

    #[test]
    fn test_empty_store_yields_zeroes() {
        let conn = with_test_db().unwrap();
        let stats = StatsRepo::new(&conn);
        let filter = RecordFilter::new();
        assert!(stats.by_agent(&filter).unwrap().is_empty());
        assert_eq!(stats.totals(&filter).unwrap(), Totals::default());
        assert!(stats.daily(&filter).unwrap().is_empty());
    }

    #[test]
    fn test_daily_rollup_by_calendar_day() {
        let conn = with_test_db().unwrap();
        seed(&conn, "PAP801", at(3, 23, 59, 59, 999_999), 10, [1, 0, 0, 0]);
        seed(&conn, "PAP802", at(3, 0, 0, 0, 0), 5, [0, 0, 0, 0]);
        seed(&conn, "PAP801", at(4, 0, 0, 0, 0), 20, [0, 1, 0, 0]);
        let stats = StatsRepo::new(&conn);
        let pole_filter = RecordFilter::new().with_pole(Some("Parauapebas"));

        let daily = stats.daily(&pole_filter).unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].data, NaiveDate::from_ymd_opt(2026, 4, 3).unwrap());
        assert_eq!(daily[0].visitas, 15);
        assert_eq!(daily[0].prospectores, 2);
        assert_eq!(daily[1].apontamentos, 1);
        assert_eq!(daily[1].prospectores, 1);
    }

    #[test]
    fn test_window_is_half_open() {
        let conn = with_test_db().unwrap();
        seed(&conn, "PAP801", at(7, 23, 59, 59, 999_999), 1, [0, 0, 0, 0]);
        seed(&conn, "PAP801", at(8, 0, 0, 0, 0), 2, [1, 0, 0, 0]);
        seed(&conn, "TUC802", at(8, 23, 59, 59, 999_999), 4, [0, 0, 0, 0]);
        seed(&conn, "PAP801", at(9, 0, 0, 0, 0), 8, [0, 0, 0, 0]);
        let stats = StatsRepo::new(&conn);

        let (start, end) = day_window(NaiveDate::from_ymd_opt(2026, 4, 8).unwrap());
        let snapshot = stats.window(start, end).unwrap();
        assert_eq!(snapshot.visitas, 6);
        assert_eq!(snapshot.apontamentos, 1);
        assert_eq!(snapshot.prospectores_ativos, 2);
        assert_eq!(snapshot.trafos, 2);
    }
}
