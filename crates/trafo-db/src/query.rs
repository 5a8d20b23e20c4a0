use crate::util::encode_business_date;
use rusqlite::types::Value;
use trafo_core::types::RecordFilter;

/// `WHERE` fragment with positional `?N` placeholders and the values bound to them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_filter(filter: &RecordFilter) -> Self {
        let mut clause = Self::new();
        if let Some(start) = filter.lower_bound() {
            clause.push("data", ">=", encode_business_date(&start));
        }
        if let Some(end) = filter.upper_bound() {
            clause.push("data", "<=", encode_business_date(&end));
        }
        if let Some(agent_code) = filter.agent_code() {
            clause.push("prospector", "=", agent_code.to_string());
        }
        if let Some(pole) = filter.pole() {
            clause.push("polo", "=", pole.to_string());
        }
        clause
    }

    pub fn push(&mut self, column: &str, op: &str, value: impl Into<Value>) {
        self.params.push(value.into());
        self.conditions
            .push(format!("{column} {op} ?{}", self.params.len()));
    }

    /// Empty string when there are no conditions, else a leading-space ` WHERE ...`.
    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}
