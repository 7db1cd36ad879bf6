use fms_core::{
    DraftState, FlightPlan, FlightPlanService, FlightPlanStore, NavDatabase, PlanField, PlanResult,
};
use serde::Serialize;
use tracing::debug;

use super::script::{ScriptCommand, ScriptLine};
use crate::{AppError, DisplayFallback, Result};

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutput {
    Plan(PlanView),
    Slots(SlotList),
}

impl DisplayFallback for SessionOutput {
    fn display(&self) -> String {
        match self {
            SessionOutput::Plan(view) => view.display(),
            SessionOutput::Slots(list) => list.display(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanView {
    pub state: DraftState,
    pub revision: u64,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Serialize)]
pub struct FieldView {
    pub field: PlanField,
    pub ident: Option<String>,
}

impl PlanView {
    fn new(state: DraftState, plan: &FlightPlan) -> Self {
        Self {
            state,
            revision: plan.revision,
            fields: PlanField::ALL
                .iter()
                .map(|field| FieldView {
                    field: *field,
                    ident: plan.field_ident(*field).map(str::to_string),
                })
                .collect(),
        }
    }
}

impl DisplayFallback for PlanView {
    fn display(&self) -> String {
        let mut lines = vec![format!("{} (revision {})", self.state, self.revision)];
        for entry in &self.fields {
            lines.push(format!(
                "  {}: {}",
                entry.field,
                entry.ident.as_deref().unwrap_or("-")
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct SlotList {
    pub rows: Vec<SlotRow>,
}

#[derive(Debug, Serialize)]
pub struct SlotRow {
    pub index: String,
    pub occupied: bool,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub revision: Option<u64>,
}

impl SlotList {
    fn from_store(store: &FlightPlanStore) -> Self {
        let rows = store
            .layout()
            .indices()
            .map(|index| {
                let plan = store.get(index).ok();
                SlotRow {
                    index: index.to_string(),
                    occupied: plan.is_some(),
                    origin: plan
                        .and_then(|plan| plan.field_ident(PlanField::OriginAirport))
                        .map(str::to_string),
                    destination: plan
                        .and_then(|plan| plan.field_ident(PlanField::DestinationAirport))
                        .map(str::to_string),
                    revision: plan.map(|plan| plan.revision),
                }
            })
            .collect();
        Self { rows }
    }
}

impl DisplayFallback for SlotList {
    fn display(&self) -> String {
        let mut lines = Vec::new();
        for row in &self.rows {
            if row.occupied {
                lines.push(format!(
                    "{} | {} -> {} | rev={}",
                    row.index,
                    row.origin.as_deref().unwrap_or("----"),
                    row.destination.as_deref().unwrap_or("----"),
                    row.revision.unwrap_or_default()
                ));
            } else {
                lines.push(format!("{} | <empty>", row.index));
            }
        }
        lines.join("\n")
    }
}

/// Runs one script line against the service. Only `show` and `slots`
/// produce output.
pub async fn execute<D: NavDatabase>(
    service: &FlightPlanService<D>,
    step: &ScriptLine,
) -> Result<Option<SessionOutput>> {
    debug!(line = step.line, command = ?step.command, "executing script line");
    apply(service, &step.command)
        .await
        .map_err(|source| AppError::Step {
            line: step.line,
            source,
        })
}

async fn apply<D: NavDatabase>(
    service: &FlightPlanService<D>,
    command: &ScriptCommand,
) -> PlanResult<Option<SessionOutput>> {
    match command {
        ScriptCommand::CityPair {
            origin,
            destination,
            alternate,
        } => {
            service
                .new_city_pair(origin, destination, alternate.as_deref())
                .await?
        }
        ScriptCommand::OriginRunway(ident) => service.set_origin_runway(ident).await?,
        ScriptCommand::DestinationRunway(ident) => service.set_destination_runway(ident).await?,
        ScriptCommand::Departure(ident) => service.set_departure_procedure(ident).await?,
        ScriptCommand::DepartureTransition(ident) => {
            service.set_departure_enroute_transition(ident).await?
        }
        ScriptCommand::Arrival(ident) => service.set_arrival_procedure(ident).await?,
        ScriptCommand::ArrivalTransition(ident) => {
            service.set_arrival_enroute_transition(ident).await?
        }
        ScriptCommand::Approach(ident) => service.set_approach_procedure(ident).await?,
        ScriptCommand::ApproachVia(ident) => service.set_approach_via(ident).await?,
        ScriptCommand::Commit => service.temporary_insert().await?,
        ScriptCommand::Discard => service.temporary_delete().await?,
        ScriptCommand::Show => {
            let (state, plan) = service.snapshot().await?;
            return Ok(Some(SessionOutput::Plan(PlanView::new(state, &plan))));
        }
        ScriptCommand::Slots => {
            let store = service.store().await;
            return Ok(Some(SessionOutput::Slots(SlotList::from_store(&store))));
        }
        ScriptCommand::Create(index) => service.store().await.create(*index, None)?,
        ScriptCommand::Delete(index) => service.store().await.delete(*index)?,
        ScriptCommand::Copy { from, to } => service.store().await.copy(*from, *to)?,
        ScriptCommand::Swap { a, b } => service.store().await.swap(*a, *b)?,
    }
    Ok(None)
}
