use serde::{Deserialize, Serialize};

/// Identifier of a housing unit, as keyed in the document store.
pub type HouseId = String;

/// The reserved gatehouse unit; never a quota participant.
pub const RESERVED_GATE_ID: &str = "porteria";

/// Explicit actor identity passed into every mutating call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub actor_id: String,
}

impl Context {
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
        }
    }
}

/// A housing unit eligible to participate in quotas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HousingUnit {
    pub id: HouseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl HousingUnit {
    pub fn new(id: impl Into<HouseId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: None,
            contact: None,
        }
    }

    pub fn is_gate(&self) -> bool {
        self.id == RESERVED_GATE_ID
    }
}
