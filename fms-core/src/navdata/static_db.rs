use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::trace;

use super::{
    airport_ident, find_transition, normalize_ident, runway_ident, Airport, NavDatabase,
    NavdataError, NavdataResult, Procedure, ProcedureKind, ProcedureTransition, RecordKind,
    Runway,
};

#[derive(Debug, Clone, Default, Deserialize)]
struct NavdataFile {
    #[serde(default)]
    airports: Vec<AirportRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct AirportRecord {
    ident: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    runways: Vec<String>,
    #[serde(default)]
    departures: Vec<ProcedureRecord>,
    #[serde(default)]
    arrivals: Vec<ProcedureRecord>,
    #[serde(default)]
    approaches: Vec<ProcedureRecord>,
}

impl AirportRecord {
    fn to_airport(&self) -> Airport {
        Airport {
            ident: normalize_ident(&self.ident),
            name: self.name.clone(),
        }
    }

    fn procedures(&self, kind: ProcedureKind) -> &[ProcedureRecord] {
        match kind {
            ProcedureKind::Departure => &self.departures,
            ProcedureKind::Arrival => &self.arrivals,
            ProcedureKind::Approach => &self.approaches,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ProcedureRecord {
    ident: String,
    #[serde(default)]
    runways: Vec<String>,
    #[serde(default)]
    enroute_transitions: Vec<String>,
    #[serde(default)]
    approach_vias: Vec<String>,
}

/// In-memory navigation database backed by a TOML document.
///
/// An optional artificial latency is applied before every lookup so callers
/// can exercise the suspension point of the editing protocol.
#[derive(Debug, Clone, Default)]
pub struct StaticNavDatabase {
    airports: Vec<AirportRecord>,
    latency: Option<Duration>,
}

impl StaticNavDatabase {
    pub fn load(path: impl AsRef<Path>) -> NavdataResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| NavdataError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        let file: NavdataFile = toml::from_str(&content).map_err(|source| NavdataError::Parse {
            source,
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            airports: file.airports,
            latency: None,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: NavdataFile = toml::from_str(content)?;
        Ok(Self {
            airports: file.airports,
            latency: None,
        })
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn airports(&self) -> Vec<Airport> {
        self.airports.iter().map(AirportRecord::to_airport).collect()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            sleep(latency).await;
        }
    }

    fn airport_record(&self, ident: &str) -> NavdataResult<&AirportRecord> {
        let wanted = airport_ident(ident)?;
        unique(
            self.airports
                .iter()
                .filter(|record| normalize_ident(&record.ident) == wanted),
            RecordKind::Airport,
            ident,
        )
    }
}

fn unique<'a, T>(
    mut matches: impl Iterator<Item = &'a T>,
    kind: RecordKind,
    ident: &str,
) -> NavdataResult<&'a T> {
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
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

#[async_trait]
impl NavDatabase for StaticNavDatabase {
    async fn airport(&self, ident: &str) -> NavdataResult<Airport> {
        self.pause().await;
        trace!(ident, "airport lookup");
        self.airport_record(ident).map(AirportRecord::to_airport)
    }

    async fn runway(&self, airport: &Airport, ident: &str) -> NavdataResult<Runway> {
        self.pause().await;
        trace!(airport = %airport.ident, ident, "runway lookup");
        let wanted = runway_ident(ident)?;
        let record = self.airport_record(&airport.ident)?;
        let found = unique(
            record.runways.iter().filter(|candidate| {
                runway_ident(candidate).ok().as_deref() == Some(wanted.as_str())
            }),
            RecordKind::Runway,
            ident,
        )?;
        Ok(Runway {
            ident: runway_ident(found)?,
            airport_ident: record.to_airport().ident,
        })
    }

    async fn procedure(
        &self,
        airport: &Airport,
        kind: ProcedureKind,
        ident: &str,
    ) -> NavdataResult<Procedure> {
        self.pause().await;
        trace!(airport = %airport.ident, %kind, ident, "procedure lookup");
        let wanted = normalize_ident(ident);
        let record = self.airport_record(&airport.ident)?;
        let found = unique(
            record
                .procedures(kind)
                .iter()
                .filter(|candidate| normalize_ident(&candidate.ident) == wanted),
            kind.record_kind(),
            ident,
        )?;
        Ok(Procedure {
            ident: found.ident.clone(),
            kind,
            airport_ident: record.to_airport().ident,
            runways: found.runways.clone(),
            enroute_transitions: found.enroute_transitions.clone(),
            approach_vias: found.approach_vias.clone(),
        })
    }

    async fn enroute_transition(
        &self,
        procedure: &Procedure,
        ident: &str,
    ) -> NavdataResult<ProcedureTransition> {
        self.pause().await;
        trace!(procedure = %procedure.ident, ident, "enroute transition lookup");
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
        self.pause().await;
        trace!(procedure = %procedure.ident, ident, "approach via lookup");
        find_transition(
            procedure,
            &procedure.approach_vias,
            RecordKind::ApproachVia,
            ident,
        )
    }
}
