pub mod dialect;
pub mod patient;
pub mod query_builder;

pub use dialect::Dialect;
pub use patient::PatientRepository;
pub use query_builder::{BuildIdParams, PatientQuery, QueryBuilder, SqlArg};
