pub mod content_negotiation;
pub mod hal;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::{app, graphql_routes, patient_routes};
pub use state::AppState;
