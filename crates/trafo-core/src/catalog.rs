use crate::types::{PoleCatalog, PoleInfo};

/// Daily visit goal per agent record.
pub const VISIT_TARGET: i64 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pole {
    pub id: &'static str,
    pub name: &'static str,
    pub stem: &'static str,
    pub agent_codes: &'static [&'static str],
}

pub const POLES: &[Pole] = &[
    Pole {
        id: "PARAUAPEBAS",
        name: "Parauapebas",
        stem: "PAP",
        agent_codes: &["PAP801", "PAP802", "PAP803"],
    },
    Pole {
        id: "MARABA",
        name: "Marabá",
        stem: "MAB",
        agent_codes: &["MAB803", "MAB804", "MAB805", "MAB806", "MAB807"],
    },
    Pole {
        id: "REDENCAO",
        name: "Redenção",
        stem: "RED",
        agent_codes: &["RED801"],
    },
    Pole {
        id: "TUCURUI",
        name: "Tucuruí",
        stem: "TUC",
        agent_codes: &["TUC801", "TUC802"],
    },
];

/// Exact agent code first, then the alphabetic stem (`PAP809` still maps to Parauapebas).
pub fn pole_for_agent(agent_code: &str) -> Option<&'static Pole> {
    let code = agent_code.trim().to_ascii_uppercase();
    if code.is_empty() {
        return None;
    }
    if let Some(pole) = POLES
        .iter()
        .find(|pole| pole.agent_codes.contains(&code.as_str()))
    {
        return Some(pole);
    }
    let stem: String = code
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    POLES.iter().find(|pole| pole.stem == stem)
}

/// Pole name stored with a record; the catalog wins over whatever the client sent.
pub fn resolve_pole(agent_code: &str, client_pole: Option<&str>) -> String {
    match pole_for_agent(agent_code) {
        Some(pole) => pole.name.to_string(),
        None => client_pole.map(str::trim).unwrap_or_default().to_string(),
    }
}

pub fn catalog() -> PoleCatalog {
    PoleCatalog {
        polos: POLES
            .iter()
            .map(|pole| PoleInfo {
                id: pole.id.to_string(),
                nome: pole.name.to_string(),
                prefixos: pole.agent_codes.iter().map(|code| (*code).to_string()).collect(),
            })
            .collect(),
        meta_visitas: VISIT_TARGET,
    }
}
