/// Why a patient could not be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    #[error("versichertennummer {versichertennummer} already exists")]
    VersichertennummerExists { versichertennummer: String },
}

/// Why a patient could not be updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    #[error("no patient with id {id:?}")]
    PatientNotExists { id: Option<i64> },

    #[error("version {version:?} is not a quoted integer")]
    VersionInvalid { version: String },

    #[error("version {version} of patient {id} is outdated")]
    VersionOutdated { id: i64, version: i64 },

    /// The new versichertennummer belongs to another patient.
    #[error("versichertennummer {versichertennummer} already exists")]
    VersichertennummerExists { versichertennummer: String },
}
