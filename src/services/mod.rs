pub mod errors;
pub mod read;
pub mod validation;
pub mod write;

pub use errors::{CreateError, UpdateError};
pub use read::{FindByIdParams, PatientReadService};
pub use validation::{validate_patient, validate_patient_update, ValidationErrors};
pub use write::{PatientWriteService, UpdateParams};
