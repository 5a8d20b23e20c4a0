use crate::query::WhereClause;
use crate::util::{coerce_count, decode_business_date, encode_business_date, from_timestamp, to_timestamp};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use trafo_core::error::RecordError;
use trafo_core::records::RecordRepository;
use trafo_core::types::{Record, RecordDraft, RecordFilter, RecordId, RecordStatus};

const RECORD_COLUMNS: &str = "id, data, prospector, polo, prefixo, trafo, visitas, cod100, cod200, cod300, clandestino, inclusao, exclusao, ip, observacoes, status, total_apontamentos, created_at, updated_at";

pub struct RecordRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> RecordRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Reads back a row just written, so callers see stored precision.
    fn reload(&self, id: &RecordId) -> Result<Record, RecordError> {
        self.get(id)?.ok_or_else(|| RecordError::Storage {
            message: format!("record {id} missing after write"),
        })
    }
}

impl<'a> RecordRepository for RecordRepo<'a> {
    fn create(&self, draft: RecordDraft) -> Result<Record, RecordError> {
        let now = chrono::Utc::now();
        let record = Record::from_draft(RecordId::generate(), draft, now, now);
        let sql = format!(
            "INSERT INTO registros ({RECORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"
        );
        self.conn
            .execute(&sql, params_from_iter(record_values(&record)))
            .map_err(storage)?;
        self.reload(&record.id)
    }

    fn get(&self, id: &RecordId) -> Result<Option<Record>, RecordError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM registros WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, [id.as_str()], |row| Ok(map_record_row(row)))
            .optional()
            .map_err(storage)?;
        row.transpose()
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<Record>, RecordError> {
        let clause = WhereClause::from_filter(filter);
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM registros{} ORDER BY created_at DESC, rowid DESC",
            clause.sql()
        );
        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let mut rows = stmt
            .query(params_from_iter(clause.params()))
            .map_err(storage)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(storage)? {
            records.push(map_record_row(row)?);
        }
        Ok(records)
    }

    fn replace(&self, id: &RecordId, draft: RecordDraft) -> Result<Record, RecordError> {
        let Some(existing) = self.get(id)? else {
            return Err(RecordError::NotFound);
        };
        let record = Record::from_draft(id.clone(), draft, existing.created_at, chrono::Utc::now());
        let sql = "UPDATE registros SET data = ?2, prospector = ?3, polo = ?4, prefixo = ?5, trafo = ?6, visitas = ?7, cod100 = ?8, cod200 = ?9, cod300 = ?10, clandestino = ?11, inclusao = ?12, exclusao = ?13, ip = ?14, observacoes = ?15, status = ?16, total_apontamentos = ?17, created_at = ?18, updated_at = ?19 WHERE id = ?1";
        let changed = self
            .conn
            .execute(sql, params_from_iter(record_values(&record)))
            .map_err(storage)?;
        if changed == 0 {
            return Err(RecordError::NotFound);
        }
        self.reload(id)
    }

    fn delete(&self, id: &RecordId) -> Result<(), RecordError> {
        self.conn
            .execute("DELETE FROM registros WHERE id = ?1", [id.as_str()])
            .map_err(storage)?;
        Ok(())
    }
}

/// Values in `RECORD_COLUMNS` order.
fn record_values(record: &Record) -> Vec<Value> {
    vec![
        Value::Text(record.id.as_str().to_string()),
        Value::Text(encode_business_date(&record.date)),
        Value::Text(record.agent_code.clone()),
        Value::Text(record.pole.clone()),
        Value::Text(record.prefix.clone()),
        record.transformer_ref.clone().map_or(Value::Null, Value::Text),
        Value::Integer(record.visits),
        Value::Integer(record.code100),
        Value::Integer(record.code200),
        Value::Integer(record.code300),
        Value::Integer(record.clandestine),
        Value::Integer(record.inclusions),
        Value::Integer(record.exclusions),
        Value::Integer(record.ip),
        record.notes.clone().map_or(Value::Null, Value::Text),
        Value::Text(record.status.as_str().to_string()),
        Value::Integer(record.total_apontamentos),
        Value::Text(to_timestamp(&record.created_at)),
        Value::Text(to_timestamp(&record.updated_at)),
    ]
}

fn map_record_row(row: &rusqlite::Row<'_>) -> Result<Record, RecordError> {
    let text = |index: usize| -> Result<String, RecordError> {
        let value: Option<String> = row.get(index).map_err(storage)?;
        Ok(value.unwrap_or_default())
    };
    let optional_text = |index: usize| -> Result<Option<String>, RecordError> {
        row.get::<_, Option<String>>(index).map_err(storage)
    };
    let count = |index: usize| -> Result<i64, RecordError> {
        let value: Value = row.get(index).map_err(storage)?;
        Ok(coerce_count(value))
    };

    let id = RecordId::new(text(0)?).map_err(|err| RecordError::Storage {
        message: err.to_string(),
    })?;
    let date = decode_business_date(&text(1)?).map_err(storage)?;
    let created_at = from_timestamp(&text(17)?).map_err(storage)?;
    let updated_at = from_timestamp(&text(18)?).map_err(storage)?;

    Ok(Record {
        id,
        date,
        agent_code: text(2)?,
        pole: text(3)?,
        prefix: text(4)?,
        transformer_ref: optional_text(5)?,
        visits: count(6)?,
        code100: count(7)?,
        code200: count(8)?,
        code300: count(9)?,
        clandestine: count(10)?,
        inclusions: count(11)?,
        exclusions: count(12)?,
        ip: count(13)?,
        notes: optional_text(14)?,
        status: RecordStatus::parse_lenient(&text(15)?),
        total_apontamentos: count(16)?,
        created_at,
        updated_at,
    })
}

fn storage(err: impl std::fmt::Display) -> RecordError {
    RecordError::Storage {
        message: err.to_string(),
    }
}
