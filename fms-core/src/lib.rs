pub mod config;
pub mod error;
pub mod navdata;
pub mod plan;

pub use config::{load_fms_config, FmsConfig};
pub use error::{ConfigError, Result};
pub use navdata::{
    Airport, NavDatabase, NavdataError, NavdataResult, Procedure, ProcedureKind,
    ProcedureTransition, RecordKind, Runway, StaticNavDatabase,
};
pub use plan::{
    DraftState, FlightPlan, FlightPlanDefinition, FlightPlanService, FlightPlanStore, PlanError,
    PlanField, PlanIndex, PlanResult, SlotLayout,
};
