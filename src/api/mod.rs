pub mod auth;
pub mod errors;
pub mod health;
pub mod profile;
pub mod records;
pub mod roadmap;
pub mod routes;
pub mod workout;

pub use errors::ApiError;
pub use routes::{create_routes, AppState};
