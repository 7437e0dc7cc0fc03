//! GraphQL interface: queries `patient` and `patienten`, mutations `create`
//! and `update`. The caller's [`crate::auth::Principal`], if any, is attached
//! to each request by the HTTP handler.

pub mod error;
pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::{EmptySubscription, Schema};

use crate::services::{PatientReadService, PatientWriteService};

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type PatientSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(
    read_service: PatientReadService,
    write_service: PatientWriteService,
) -> PatientSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(read_service)
        .data(write_service)
        .finish()
}
