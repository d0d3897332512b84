// Data models and row types

pub mod profile;
pub mod roadmap;
pub mod user;
pub mod workout_log;

pub use profile::*;
pub use roadmap::*;
pub use user::*;
pub use workout_log::*;
