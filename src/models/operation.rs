use serde::{Deserialize, Serialize};

use super::traits::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Assigned by the store, `None` until the owning patient is saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub eingriff: String,
    pub behandlungsraum: Option<i64>,
}

impl Operation {
    pub fn new(eingriff: impl Into<String>, behandlungsraum: Option<i64>) -> Self {
        Self {
            id: None,
            eingriff: eingriff.into(),
            behandlungsraum,
        }
    }
}

impl Entity for Operation {
    const TABLE_NAME: &'static str = "operation";
}
