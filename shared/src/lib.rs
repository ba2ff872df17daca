use serde::{Deserialize, Serialize};

mod bonus;
mod reward;
mod timeperiod;

pub use bonus::*;
pub use reward::*;
pub use timeperiod::*;

/// Opaque identifier of a contributor in the identity store.
pub type ContributorId = String;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BuilderStatus {
    Applied,
    Approved,
    Rejected,
    Banned,
}

impl BuilderStatus {
    pub fn is_approved(&self) -> bool {
        matches!(self, BuilderStatus::Approved)
    }
}
