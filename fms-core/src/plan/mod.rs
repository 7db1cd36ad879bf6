pub mod error;
pub mod index;
pub mod models;
pub mod service;
pub mod store;

pub use error::{PlanError, PlanResult};
pub use index::{PlanIndex, SlotLayout};
pub use models::{FlightPlan, FlightPlanDefinition, PlanField};
pub use service::{DraftState, FlightPlanService};
pub use store::FlightPlanStore;
