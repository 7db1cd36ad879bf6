use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::config::FmsConfig;
use crate::navdata::{NavDatabase, NavdataResult, ProcedureKind, StaticNavDatabase};

use super::index::{PlanIndex, SlotLayout};
use super::models::{FlightPlan, PlanField};
use super::store::FlightPlanStore;
use super::{PlanError, PlanResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    NoDraft,
    DraftPending,
}

impl fmt::Display for DraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftState::NoDraft => f.write_str("no_draft"),
            DraftState::DraftPending => f.write_str("draft_pending"),
        }
    }
}

/// Copy-on-write editing on top of a [`FlightPlanStore`].
///
/// Setters resolve their idents first, without holding the store, and then
/// apply the result in one critical section that creates the temporary plan
/// if needed and writes the field. The active plan only changes through
/// [`temporary_insert`](Self::temporary_insert) or
/// [`new_city_pair`](Self::new_city_pair).
pub struct FlightPlanService<D> {
    database: Arc<D>,
    store: Mutex<FlightPlanStore>,
}

impl FlightPlanService<StaticNavDatabase> {
    pub fn from_config(config: &FmsConfig) -> NavdataResult<Self> {
        let database = StaticNavDatabase::load(config.navdata_path())?;
        Ok(Self::new(Arc::new(database), config.slot_layout()))
    }
}

impl<D: NavDatabase> FlightPlanService<D> {
    pub fn new(database: Arc<D>, layout: SlotLayout) -> Self {
        Self {
            database,
            store: Mutex::new(FlightPlanStore::new(layout)),
        }
    }

    pub fn database(&self) -> &Arc<D> {
        &self.database
    }

    /// Exclusive access to the underlying store for slot operations.
    ///
    /// Every other method locks the same mutex, so awaiting one of them on
    /// this service while the guard is alive never completes.
    pub async fn store(&self) -> MutexGuard<'_, FlightPlanStore> {
        self.store.lock().await
    }

    /// The temporary plan when one is pending, otherwise the active plan.
    pub async fn current(&self) -> PlanResult<FlightPlan> {
        let store = self.store.lock().await;
        current_in(&store).cloned()
    }

    pub async fn has_temporary(&self) -> bool {
        self.store.lock().await.has(PlanIndex::Temporary)
    }

    pub async fn draft_state(&self) -> DraftState {
        draft_state_in(&*self.store.lock().await)
    }

    /// Draft state and current plan read under a single lock.
    pub async fn snapshot(&self) -> PlanResult<(DraftState, FlightPlan)> {
        let store = self.store.lock().await;
        let plan = current_in(&store)?.clone();
        Ok((draft_state_in(&store), plan))
    }

    pub async fn ensure_draft(&self) -> PlanResult<()> {
        let mut store = self.store.lock().await;
        ensure_draft_in(&mut store).map(|_| ())
    }

    pub async fn set_origin_runway(&self, ident: &str) -> PlanResult<()> {
        let plan = self.current().await?;
        let airport = require(
            plan.origin_airport,
            PlanField::OriginRunway,
            PlanField::OriginAirport,
        )?;
        let runway = self.database.runway(&airport, ident).await?;
        self.apply(
            PlanField::OriginRunway,
            PlanField::OriginAirport,
            &airport.ident,
            move |plan| plan.origin_runway = Some(runway),
        )
        .await
    }

    pub async fn set_destination_runway(&self, ident: &str) -> PlanResult<()> {
        let plan = self.current().await?;
        let airport = require(
            plan.destination_airport,
            PlanField::DestinationRunway,
            PlanField::DestinationAirport,
        )?;
        let runway = self.database.runway(&airport, ident).await?;
        self.apply(
            PlanField::DestinationRunway,
            PlanField::DestinationAirport,
            &airport.ident,
            move |plan| plan.destination_runway = Some(runway),
        )
        .await
    }

    pub async fn set_departure_procedure(&self, ident: &str) -> PlanResult<()> {
        let plan = self.current().await?;
        let airport = require(
            plan.origin_airport,
            PlanField::Departure,
            PlanField::OriginAirport,
        )?;
        let procedure = self
            .database
            .procedure(&airport, ProcedureKind::Departure, ident)
            .await?;
        self.apply(
            PlanField::Departure,
            PlanField::OriginAirport,
            &airport.ident,
            move |plan| plan.departure = Some(procedure),
        )
        .await
    }

    pub async fn set_departure_enroute_transition(&self, ident: &str) -> PlanResult<()> {
        let plan = self.current().await?;
        let departure = require(
            plan.departure,
            PlanField::DepartureEnrouteTransition,
            PlanField::Departure,
        )?;
        let transition = self.database.enroute_transition(&departure, ident).await?;
        self.apply(
            PlanField::DepartureEnrouteTransition,
            PlanField::Departure,
            &departure.ident,
            move |plan| plan.departure_enroute_transition = Some(transition),
        )
        .await
    }

    pub async fn set_arrival_procedure(&self, ident: &str) -> PlanResult<()> {
        let plan = self.current().await?;
        let airport = require(
            plan.destination_airport,
            PlanField::Arrival,
            PlanField::DestinationAirport,
        )?;
        let procedure = self
            .database
            .procedure(&airport, ProcedureKind::Arrival, ident)
            .await?;
        self.apply(
            PlanField::Arrival,
            PlanField::DestinationAirport,
            &airport.ident,
            move |plan| plan.arrival = Some(procedure),
        )
        .await
    }

    pub async fn set_arrival_enroute_transition(&self, ident: &str) -> PlanResult<()> {
        let plan = self.current().await?;
        let arrival = require(
            plan.arrival,
            PlanField::ArrivalEnrouteTransition,
            PlanField::Arrival,
        )?;
        let transition = self.database.enroute_transition(&arrival, ident).await?;
        self.apply(
            PlanField::ArrivalEnrouteTransition,
            PlanField::Arrival,
            &arrival.ident,
            move |plan| plan.arrival_enroute_transition = Some(transition),
        )
        .await
    }

    pub async fn set_approach_procedure(&self, ident: &str) -> PlanResult<()> {
        let plan = self.current().await?;
        let airport = require(
            plan.destination_airport,
            PlanField::Approach,
            PlanField::DestinationAirport,
        )?;
        let procedure = self
            .database
            .procedure(&airport, ProcedureKind::Approach, ident)
            .await?;
        self.apply(
            PlanField::Approach,
            PlanField::DestinationAirport,
            &airport.ident,
            move |plan| plan.approach = Some(procedure),
        )
        .await
    }

    pub async fn set_approach_via(&self, ident: &str) -> PlanResult<()> {
        let plan = self.current().await?;
        let approach = require(plan.approach, PlanField::ApproachVia, PlanField::Approach)?;
        let via = self.database.approach_via(&approach, ident).await?;
        self.apply(
            PlanField::ApproachVia,
            PlanField::Approach,
            &approach.ident,
            move |plan| plan.approach_via = Some(via),
        )
        .await
    }

    /// Promotes the temporary plan to active and clears the temporary slot.
    pub async fn temporary_insert(&self) -> PlanResult<()> {
        let mut store = self.store.lock().await;
        if !store.has(PlanIndex::Temporary) {
            return Err(PlanError::NoPendingDraft);
        }
        let draft = store.take(PlanIndex::Temporary)?;
        let revision = draft.revision;
        store.set(PlanIndex::Active, draft)?;
        info!(revision, "temporary flight plan inserted");
        Ok(())
    }

    /// Drops the temporary plan, leaving the active plan untouched.
    pub async fn temporary_delete(&self) -> PlanResult<()> {
        let mut store = self.store.lock().await;
        if !store.has(PlanIndex::Temporary) {
            return Err(PlanError::NoPendingDraft);
        }
        let draft = store.take(PlanIndex::Temporary)?;
        info!(revision = draft.revision, "temporary flight plan deleted");
        Ok(())
    }

    /// Replaces the active plan with a fresh one for the given airports and
    /// drops any pending temporary plan.
    pub async fn new_city_pair(
        &self,
        origin: &str,
        destination: &str,
        alternate: Option<&str>,
    ) -> PlanResult<()> {
        let alternate_lookup = async {
            match alternate {
                Some(ident) => self.database.airport(ident).await.map(Some),
                None => Ok(None),
            }
        };
        let (origin_airport, destination_airport, alternate_airport) = futures::try_join!(
            self.database.airport(origin),
            self.database.airport(destination),
            alternate_lookup,
        )?;

        let plan = FlightPlan::city_pair(origin_airport, destination_airport, alternate_airport);
        let mut store = self.store.lock().await;
        store.set(PlanIndex::Active, plan)?;
        let discarded = store.has(PlanIndex::Temporary);
        if discarded {
            store.take(PlanIndex::Temporary)?;
        }
        info!(
            origin,
            destination,
            alternate = alternate.unwrap_or("-"),
            discarded_draft = discarded,
            "new city pair"
        );
        Ok(())
    }

    /// Overwrites a secondary plan with a copy of the active plan.
    pub async fn reset_secondary(&self, n: u8) -> PlanResult<()> {
        let mut store = self.store.lock().await;
        store.copy(PlanIndex::Active, PlanIndex::Secondary(n))
    }

    /// Writes `field` on the temporary plan, provided `requires` still holds
    /// the value the lookup was resolved against.
    async fn apply<F>(
        &self,
        field: PlanField,
        requires: PlanField,
        resolved_against: &str,
        write: F,
    ) -> PlanResult<()>
    where
        F: FnOnce(&mut FlightPlan),
    {
        let mut store = self.store.lock().await;
        if current_in(&store)?.field_ident(requires) != Some(resolved_against) {
            debug!(%field, %requires, resolved_against, "lookup context changed");
            return Err(PlanError::StaleContext { field, requires });
        }
        let created = ensure_draft_in(&mut store)?;
        let draft = store.get_mut(PlanIndex::Temporary)?;
        write(draft);
        draft.bump_revision();
        info!(
            %field,
            ident = draft.field_ident(field).unwrap_or("-"),
            revision = draft.revision,
            created_draft = created,
            "temporary flight plan edited"
        );
        Ok(())
    }
}

fn current_in(store: &FlightPlanStore) -> PlanResult<&FlightPlan> {
    if store.has(PlanIndex::Temporary) {
        store.get(PlanIndex::Temporary)
    } else {
        store.get(PlanIndex::Active)
    }
}

fn draft_state_in(store: &FlightPlanStore) -> DraftState {
    if store.has(PlanIndex::Temporary) {
        DraftState::DraftPending
    } else {
        DraftState::NoDraft
    }
}

/// Returns whether a new temporary plan had to be cloned from the active one.
fn ensure_draft_in(store: &mut FlightPlanStore) -> PlanResult<bool> {
    if store.has(PlanIndex::Temporary) {
        return Ok(false);
    }
    store.copy(PlanIndex::Active, PlanIndex::Temporary)?;
    debug!("temporary flight plan created from active");
    Ok(true)
}

fn require<T>(value: Option<T>, field: PlanField, requires: PlanField) -> PlanResult<T> {
    value.ok_or(PlanError::MissingPrerequisite { field, requires })
}
