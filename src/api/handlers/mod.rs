pub mod graphql;
pub mod patient;
pub mod patient_write;
