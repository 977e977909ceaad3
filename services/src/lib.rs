//! Domain core of the attendance tracker: session lifecycle, the three
//! capture protocols, and read-side queries. HTTP concerns stay in `api`;
//! everything here speaks `Principal` + `ServiceError`.

pub mod capture;
pub mod error;
pub mod principal;
pub mod query;
pub mod session_manager;

pub use error::ServiceError;
pub use principal::Principal;
