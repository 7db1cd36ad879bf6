use thiserror::Error;

use crate::navdata::NavdataError;

use super::index::PlanIndex;
use super::models::PlanField;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("flight plan at {index} not found")]
    NotFound { index: PlanIndex },
    #[error("flight plan at {index} already exists")]
    AlreadyExists { index: PlanIndex },
    #[error("no temporary flight plan pending")]
    NoPendingDraft,
    #[error("slot {index} outside layout with {secondary_count} secondary plans")]
    InvalidSlot {
        index: PlanIndex,
        secondary_count: u8,
    },
    #[error("cannot set {field} before {requires} is set")]
    MissingPrerequisite {
        field: PlanField,
        requires: PlanField,
    },
    #[error("{requires} changed while {field} was being resolved")]
    StaleContext {
        field: PlanField,
        requires: PlanField,
    },
    #[error("lookup failed: {0}")]
    Lookup(#[from] NavdataError),
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;
