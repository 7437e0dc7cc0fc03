use serde::{Deserialize, Serialize};

use super::traits::Entity;

/// Name of a patient. Owned by exactly one patient and stored together with it;
/// the `patient_id` foreign key exists only in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub nachname: String,
    pub vorname: String,
}

impl Name {
    pub fn new(nachname: impl Into<String>, vorname: impl Into<String>) -> Self {
        Self {
            nachname: nachname.into(),
            vorname: vorname.into(),
        }
    }
}

impl Entity for Name {
    const TABLE_NAME: &'static str = "name";
}
