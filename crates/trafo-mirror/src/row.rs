use serde::Serialize;

pub const SHEET_HEADERS: [&str; 17] = [
    "ID",
    "Data",
    "Prospector",
    "Polo",
    "Prefixo",
    "Trafo",
    "Visitas",
    "Cod 100",
    "Cod 200",
    "Cod 300",
    "Clandestino",
    "Inclusão",
    "Exclusão",
    "IP",
    "Total Apontamentos",
    "Observações",
    "Status",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(i64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        Self::Text(value.unwrap_or_default())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// One spreadsheet line, serialized as a plain JSON array of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SheetRow(Vec<Cell>);

impl SheetRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    pub fn headers() -> Self {
        Self(SHEET_HEADERS.iter().map(|header| Cell::from(*header)).collect())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// First cell when it is text; rows built from records carry the record id there.
    pub fn key(&self) -> Option<&str> {
        match self.0.first() {
            Some(Cell::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}
