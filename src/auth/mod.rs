pub mod errors;
pub mod extract;
pub mod jwt;
pub mod models;
pub mod password;
pub mod service;

pub use errors::AuthError;
pub use extract::CurrentUser;
pub use jwt::{extract_bearer_token, JwtService};
pub use models::*;
pub use service::AuthService;
