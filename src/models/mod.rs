pub mod name;
pub mod operation;
pub mod patient;
pub mod traits;

pub use name::Name;
pub use operation::Operation;
pub use patient::{NewPatient, Patient, PatientUpdate, Versicherungsart};
pub use traits::Entity;
