//! Navigation database seam.
//!
//! The editing service never interprets procedure content. It only asks a
//! [`NavDatabase`] to turn human-readable idents into records and stores
//! whatever comes back.

pub mod static_db;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use static_db::StaticNavDatabase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Airport,
    Runway,
    Departure,
    Arrival,
    Approach,
    EnrouteTransition,
    ApproachVia,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Airport => "airport",
            RecordKind::Runway => "runway",
            RecordKind::Departure => "departure",
            RecordKind::Arrival => "arrival",
            RecordKind::Approach => "approach",
            RecordKind::EnrouteTransition => "enroute transition",
            RecordKind::ApproachVia => "approach via",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum NavdataError {
    #[error("{kind} {ident} not found")]
    NotFound { kind: RecordKind, ident: String },
    #[error("{kind} {ident} is ambiguous")]
    Ambiguous { kind: RecordKind, ident: String },
    #[error("invalid {kind} ident {ident:?}")]
    InvalidIdent { kind: RecordKind, ident: String },
    #[error("failed to read navdata {path}: {source}")]
    Io { source: io::Error, path: PathBuf },
    #[error("failed to parse navdata {path}: {source}")]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },
}

pub type NavdataResult<T> = std::result::Result<T, NavdataError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureKind {
    Departure,
    Arrival,
    Approach,
}

impl ProcedureKind {
    pub fn record_kind(&self) -> RecordKind {
        match self {
            ProcedureKind::Departure => RecordKind::Departure,
            ProcedureKind::Arrival => RecordKind::Arrival,
            ProcedureKind::Approach => RecordKind::Approach,
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_kind().as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Airport {
    pub ident: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Runway {
    pub ident: String,
    pub airport_ident: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Procedure {
    pub ident: String,
    pub kind: ProcedureKind,
    pub airport_ident: String,
    #[serde(default)]
    pub runways: Vec<String>,
    #[serde(default)]
    pub enroute_transitions: Vec<String>,
    #[serde(default)]
    pub approach_vias: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcedureTransition {
    pub ident: String,
    pub procedure_ident: String,
}

/// Resolves idents into navigation records.
///
/// Lookups may suspend and may fail. Implementations must not hand out
/// records that share mutable state; every returned value is owned by the
/// caller.
#[async_trait]
pub trait NavDatabase: Send + Sync {
    async fn airport(&self, ident: &str) -> NavdataResult<Airport>;

    async fn runway(&self, airport: &Airport, ident: &str) -> NavdataResult<Runway>;

    async fn procedure(
        &self,
        airport: &Airport,
        kind: ProcedureKind,
        ident: &str,
    ) -> NavdataResult<Procedure>;

    async fn enroute_transition(
        &self,
        procedure: &Procedure,
        ident: &str,
    ) -> NavdataResult<ProcedureTransition> {
        find_transition(
            procedure,
            &procedure.enroute_transitions,
            RecordKind::EnrouteTransition,
            ident,
        )
    }

    async fn approach_via(
        &self,
        procedure: &Procedure,
        ident: &str,
    ) -> NavdataResult<ProcedureTransition> {
        find_transition(
            procedure,
            &procedure.approach_vias,
            RecordKind::ApproachVia,
            ident,
        )
    }
}

fn find_transition(
    procedure: &Procedure,
    candidates: &[String],
    kind: RecordKind,
    ident: &str,
) -> NavdataResult<ProcedureTransition> {
    let wanted = normalize_ident(ident);
    let mut matches = candidates
        .iter()
        .filter(|candidate| normalize_ident(candidate) == wanted);
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(ProcedureTransition {
            ident: found.clone(),
            procedure_ident: procedure.ident.clone(),
        }),
        (Some(_), Some(_)) => Err(NavdataError::Ambiguous {
            kind,
            ident: ident.to_string(),
        }),
        (None, _) => Err(NavdataError::NotFound {
            kind,
            ident: ident.to_string(),
        }),
    }
}

pub fn normalize_ident(ident: &str) -> String {
    ident.trim().to_ascii_uppercase()
}

/// Validates a four character ICAO airport ident and returns it upper-cased.
pub fn airport_ident(ident: &str) -> NavdataResult<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{4}$").expect("valid regex"));
    let normalized = normalize_ident(ident);
    if pattern.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(NavdataError::InvalidIdent {
            kind: RecordKind::Airport,
            ident: ident.to_string(),
        })
    }
}

/// Brings a runway ident into `RWnn[LCR]` form, accepting the bare `nn[LCR]`
/// spelling too.
pub fn runway_ident(ident: &str) -> NavdataResult<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"^(?:RW)?([0-3][0-9][LCR]?)$").expect("valid regex"));
    let normalized = normalize_ident(ident);
    pattern
        .captures(&normalized)
        .and_then(|caps| caps.get(1))
        .map(|designator| format!("RW{}", designator.as_str()))
        .ok_or_else(|| NavdataError::InvalidIdent {
            kind: RecordKind::Runway,
            ident: ident.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departure() -> Procedure {
        Procedure {
            ident: "AVSEP6".into(),
            kind: ProcedureKind::Departure,
            airport_ident: "CYYZ".into(),
            runways: vec!["RW06R".into()],
            enroute_transitions: vec!["OTNIK".into(), "DUTEL".into()],
            approach_vias: vec![],
        }
    }

    #[test]
    fn runway_idents_normalize() {
        assert_eq!(runway_ident("RW06R").unwrap(), "RW06R");
        assert_eq!(runway_ident("06r").unwrap(), "RW06R");
        assert_eq!(runway_ident(" 34 ").unwrap(), "RW34");
        assert!(matches!(
            runway_ident("RW6"),
            Err(NavdataError::InvalidIdent {
                kind: RecordKind::Runway,
                ..
            })
        ));
    }

    #[test]
    fn airport_idents_validate() {
        assert_eq!(airport_ident("cyul").unwrap(), "CYUL");
        assert!(airport_ident("YUL").is_err());
        assert!(airport_ident("CY-L").is_err());
    }

    #[test]
    fn transitions_resolve_case_insensitively() {
        let procedure = departure();
        let transition = find_transition(
            &procedure,
            &procedure.enroute_transitions,
            RecordKind::EnrouteTransition,
            "otnik",
        )
        .unwrap();
        assert_eq!(transition.ident, "OTNIK");
        assert_eq!(transition.procedure_ident, "AVSEP6");
    }

    #[test]
    fn duplicate_transitions_are_ambiguous() {
        let mut procedure = departure();
        procedure.enroute_transitions.push("otnik".into());
        let err = find_transition(
            &procedure,
            &procedure.enroute_transitions,
            RecordKind::EnrouteTransition,
            "OTNIK",
        )
        .unwrap_err();
        assert!(matches!(err, NavdataError::Ambiguous { .. }));
    }
}
