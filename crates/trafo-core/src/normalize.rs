use crate::catalog::resolve_pole;
use crate::types::{Record, RecordDraft, RecordInput};
use chrono::NaiveDateTime;
use trafo_mirror::{Cell, SheetRow};

/// Counters are stored within the 32-bit column range so sums stay representable.
pub fn clamp_counter(value: i64) -> i64 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX))
}

pub fn total_apontamentos(code100: i64, code200: i64, code300: i64, clandestine: i64) -> i64 {
    code100
        .saturating_add(code200)
        .saturating_add(code300)
        .saturating_add(clandestine)
}

/// Builds the row to write from a client payload.
///
/// The total is always recomputed and pole/prefix are re-derived from the
/// agent code; `now` is used when the payload carries no usable date.
pub fn draft_from_input(input: RecordInput, now: NaiveDateTime) -> RecordDraft {
    let agent_code = input.agent_code.unwrap_or_default();
    let pole = resolve_pole(&agent_code, input.pole.as_deref());
    let code100 = clamp_counter(input.code100);
    let code200 = clamp_counter(input.code200);
    let code300 = clamp_counter(input.code300);
    let clandestine = clamp_counter(input.clandestine);
    RecordDraft {
        date: input.date.unwrap_or(now),
        prefix: agent_code.clone(),
        agent_code,
        pole,
        transformer_ref: input.transformer_ref,
        visits: clamp_counter(input.visits),
        code100,
        code200,
        code300,
        clandestine,
        inclusions: clamp_counter(input.inclusions),
        exclusions: clamp_counter(input.exclusions),
        ip: clamp_counter(input.ip),
        notes: input.notes,
        status: input.status,
        total_apontamentos: total_apontamentos(code100, code200, code300, clandestine),
    }
}

/// Spreadsheet line for a record, in `SHEET_HEADERS` order.
pub fn sheet_row(record: &Record) -> SheetRow {
    SheetRow::new(vec![
        Cell::from(record.id.as_str()),
        Cell::from(record.date.format("%d/%m/%Y").to_string()),
        Cell::from(record.agent_code.as_str()),
        Cell::from(record.pole.as_str()),
        Cell::from(record.prefix.as_str()),
        Cell::from(record.transformer_ref.clone()),
        Cell::from(record.visits),
        Cell::from(record.code100),
        Cell::from(record.code200),
        Cell::from(record.code300),
        Cell::from(record.clandestine),
        Cell::from(record.inclusions),
        Cell::from(record.exclusions),
        Cell::from(record.ip),
        Cell::from(record.total_apontamentos),
        Cell::from(record.notes.clone()),
        Cell::from(record.status.as_str()),
    ])
}
