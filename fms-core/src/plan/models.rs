use std::fmt;

use serde::{Deserialize, Serialize};

use crate::navdata::{Airport, Procedure, ProcedureTransition, Runway};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanField {
    OriginAirport,
    DestinationAirport,
    AlternateDestinationAirport,
    OriginRunway,
    DestinationRunway,
    Departure,
    DepartureEnrouteTransition,
    Arrival,
    ArrivalEnrouteTransition,
    Approach,
    ApproachVia,
}

impl PlanField {
    pub const ALL: [PlanField; 11] = [
        PlanField::OriginAirport,
        PlanField::DestinationAirport,
        PlanField::AlternateDestinationAirport,
        PlanField::OriginRunway,
        PlanField::DestinationRunway,
        PlanField::Departure,
        PlanField::DepartureEnrouteTransition,
        PlanField::Arrival,
        PlanField::ArrivalEnrouteTransition,
        PlanField::Approach,
        PlanField::ApproachVia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanField::OriginAirport => "origin_airport",
            PlanField::DestinationAirport => "destination_airport",
            PlanField::AlternateDestinationAirport => "alternate_destination_airport",
            PlanField::OriginRunway => "origin_runway",
            PlanField::DestinationRunway => "destination_runway",
            PlanField::Departure => "departure",
            PlanField::DepartureEnrouteTransition => "departure_enroute_transition",
            PlanField::Arrival => "arrival",
            PlanField::ArrivalEnrouteTransition => "arrival_enroute_transition",
            PlanField::Approach => "approach",
            PlanField::ApproachVia => "approach_via",
        }
    }
}

impl fmt::Display for PlanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied content for a new flight plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightPlanDefinition {
    pub origin_airport: Option<Airport>,
    pub destination_airport: Option<Airport>,
    pub alternate_destination_airport: Option<Airport>,
    pub origin_runway: Option<Runway>,
    pub destination_runway: Option<Runway>,
    pub departure: Option<Procedure>,
    pub departure_enroute_transition: Option<ProcedureTransition>,
    pub arrival: Option<Procedure>,
    pub arrival_enroute_transition: Option<ProcedureTransition>,
    pub approach: Option<Procedure>,
    pub approach_via: Option<ProcedureTransition>,
}

impl FlightPlanDefinition {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

/// One snapshot of a route.
///
/// Every field is an owned value, so [`Clone`] yields a copy that shares
/// nothing with its source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlightPlan {
    pub origin_airport: Option<Airport>,
    pub destination_airport: Option<Airport>,
    pub alternate_destination_airport: Option<Airport>,
    pub origin_runway: Option<Runway>,
    pub destination_runway: Option<Runway>,
    pub departure: Option<Procedure>,
    pub departure_enroute_transition: Option<ProcedureTransition>,
    pub arrival: Option<Procedure>,
    pub arrival_enroute_transition: Option<ProcedureTransition>,
    pub approach: Option<Procedure>,
    pub approach_via: Option<ProcedureTransition>,
    /// Number of field writes applied since the plan was built.
    pub revision: u64,
}

impl FlightPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_definition(definition: &FlightPlanDefinition) -> Self {
        let definition = definition.clone();
        Self {
            origin_airport: definition.origin_airport,
            destination_airport: definition.destination_airport,
            alternate_destination_airport: definition.alternate_destination_airport,
            origin_runway: definition.origin_runway,
            destination_runway: definition.destination_runway,
            departure: definition.departure,
            departure_enroute_transition: definition.departure_enroute_transition,
            arrival: definition.arrival,
            arrival_enroute_transition: definition.arrival_enroute_transition,
            approach: definition.approach,
            approach_via: definition.approach_via,
            revision: 0,
        }
    }

    pub fn city_pair(origin: Airport, destination: Airport, alternate: Option<Airport>) -> Self {
        Self {
            origin_airport: Some(origin),
            destination_airport: Some(destination),
            alternate_destination_airport: alternate,
            ..Self::default()
        }
    }

    pub fn field_ident(&self, field: PlanField) -> Option<&str> {
        match field {
            PlanField::OriginAirport => self.origin_airport.as_ref().map(|a| a.ident.as_str()),
            PlanField::DestinationAirport => {
                self.destination_airport.as_ref().map(|a| a.ident.as_str())
            }
            PlanField::AlternateDestinationAirport => self
                .alternate_destination_airport
                .as_ref()
                .map(|a| a.ident.as_str()),
            PlanField::OriginRunway => self.origin_runway.as_ref().map(|r| r.ident.as_str()),
            PlanField::DestinationRunway => {
                self.destination_runway.as_ref().map(|r| r.ident.as_str())
            }
            PlanField::Departure => self.departure.as_ref().map(|p| p.ident.as_str()),
            PlanField::DepartureEnrouteTransition => self
                .departure_enroute_transition
                .as_ref()
                .map(|t| t.ident.as_str()),
            PlanField::Arrival => self.arrival.as_ref().map(|p| p.ident.as_str()),
            PlanField::ArrivalEnrouteTransition => self
                .arrival_enroute_transition
                .as_ref()
                .map(|t| t.ident.as_str()),
            PlanField::Approach => self.approach.as_ref().map(|p| p.ident.as_str()),
            PlanField::ApproachVia => self.approach_via.as_ref().map(|t| t.ident.as_str()),
        }
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}
