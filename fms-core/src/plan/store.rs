use std::collections::BTreeMap;

use tracing::debug;

use super::index::{PlanIndex, SlotLayout};
use super::models::{FlightPlan, FlightPlanDefinition};
use super::{PlanError, PlanResult};

/// Slot-addressed flight plans.
///
/// The active slot starts occupied by an empty plan. Every stored plan is
/// owned by exactly one slot; moving content between slots always goes
/// through a clone or a move, never a shared handle.
#[derive(Debug, Clone)]
pub struct FlightPlanStore {
    layout: SlotLayout,
    plans: BTreeMap<PlanIndex, FlightPlan>,
}

impl Default for FlightPlanStore {
    fn default() -> Self {
        Self::new(SlotLayout::default())
    }
}

impl FlightPlanStore {
    pub fn new(layout: SlotLayout) -> Self {
        let mut plans = BTreeMap::new();
        plans.insert(PlanIndex::Active, FlightPlan::empty());
        Self { layout, plans }
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    pub fn has(&self, index: PlanIndex) -> bool {
        self.plans.contains_key(&index)
    }

    pub fn get(&self, index: PlanIndex) -> PlanResult<&FlightPlan> {
        self.check_slot(index)?;
        self.plans.get(&index).ok_or(PlanError::NotFound { index })
    }

    pub fn create(
        &mut self,
        index: PlanIndex,
        definition: Option<&FlightPlanDefinition>,
    ) -> PlanResult<()> {
        self.check_slot(index)?;
        if self.has(index) {
            return Err(PlanError::AlreadyExists { index });
        }
        let plan = match definition {
            Some(definition) => FlightPlan::from_definition(definition),
            None => FlightPlan::empty(),
        };
        self.plans.insert(index, plan);
        debug!(%index, from_definition = definition.is_some(), "flight plan created");
        Ok(())
    }

    pub fn delete(&mut self, index: PlanIndex) -> PlanResult<()> {
        self.take(index).map(|_| ())
    }

    /// Exchanges the plans held at `a` and `b`. Both slots must be occupied
    /// and stay occupied.
    pub fn swap(&mut self, a: PlanIndex, b: PlanIndex) -> PlanResult<()> {
        self.get(a)?;
        self.get(b)?;
        if a == b {
            return Ok(());
        }
        let first = self.take(a)?;
        let second = self.take(b)?;
        self.plans.insert(a, second);
        self.plans.insert(b, first);
        debug!(%a, %b, "flight plans swapped");
        Ok(())
    }

    /// Clones the plan at `from` into `to`.
    ///
    /// Only the source is checked: whatever sits at `to` is overwritten
    /// without an `AlreadyExists` error.
    pub fn copy(&mut self, from: PlanIndex, to: PlanIndex) -> PlanResult<()> {
        let plan = self.get(from)?.clone();
        self.set(to, plan)?;
        debug!(%from, %to, "flight plan copied");
        Ok(())
    }

    /// Occupied slots in raw index order.
    pub fn occupied(&self) -> impl Iterator<Item = PlanIndex> + '_ {
        self.plans.keys().copied()
    }

    pub(crate) fn get_mut(&mut self, index: PlanIndex) -> PlanResult<&mut FlightPlan> {
        self.check_slot(index)?;
        self.plans
            .get_mut(&index)
            .ok_or(PlanError::NotFound { index })
    }

    pub(crate) fn set(&mut self, index: PlanIndex, plan: FlightPlan) -> PlanResult<()> {
        self.check_slot(index)?;
        self.plans.insert(index, plan);
        Ok(())
    }

    pub(crate) fn take(&mut self, index: PlanIndex) -> PlanResult<FlightPlan> {
        self.check_slot(index)?;
        let plan = self
            .plans
            .remove(&index)
            .ok_or(PlanError::NotFound { index })?;
        debug!(%index, "flight plan slot cleared");
        Ok(plan)
    }

    fn check_slot(&self, index: PlanIndex) -> PlanResult<()> {
        if self.layout.contains(index) {
            Ok(())
        } else {
            Err(PlanError::InvalidSlot {
                index,
                secondary_count: self.layout.secondary_count(),
            })
        }
    }
}
